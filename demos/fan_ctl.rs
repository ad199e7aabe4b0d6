use std::env;

use http_fan::{Characteristic, FanAccessory, FanConfig};

#[tokio::main]
async fn main() -> http_fan::Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let config_path = args
        .get(1)
        .expect("usage: fan_ctl <config.json> [on|off|speed <percent>]");
    let config_json = std::fs::read_to_string(config_path).expect("failed to read config file");
    let config = FanConfig::from_json(&config_json)?;

    let accessory = FanAccessory::builder(config)
        .on_update(|update| {
            println!("pushed update: {} -> {}", update.characteristic, update.value);
        })
        .build();

    match args.get(2).map(String::as_str) {
        Some("on") => accessory.write(Characteristic::Active, 1).await?,
        Some("off") => accessory.write(Characteristic::Active, 0).await?,
        Some("speed") => {
            let value = args
                .get(3)
                .and_then(|v| v.parse().ok())
                .expect("usage: fan_ctl <config.json> speed <percent>");
            accessory.write(Characteristic::RotationSpeed, value).await?;
        }
        Some(other) => {
            eprintln!("unknown command: {other}");
            std::process::exit(2);
        }
        None => {}
    }

    let active = accessory.read(Characteristic::Active).await?;
    println!("[{}] active: {active}", accessory.name());

    if accessory.characteristics().contains(&Characteristic::RotationSpeed) {
        let speed = accessory.read(Characteristic::RotationSpeed).await?;
        println!("[{}] rotation speed: {speed} %", accessory.name());
    }

    Ok(())
}
