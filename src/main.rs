use anyhow::Result;
use clap::Parser;
use log::info;
use veriwipe::{erase_and_certify, report, scanner, RunConfig, SystemRunner};

#[derive(Parser)]
#[command(name = "veriwipe")]
#[command(about = "Secure drive erasure with cryptographically signed wipe certificates")]
#[command(version)]
struct Cli {
    /// Device path to erase (e.g. /dev/sda)
    device: Option<String>,

    /// List all discoverable devices and exit
    #[arg(short = 'l', long = "list")]
    list: bool,

    /// Base name for output certificate files
    #[arg(short, long, default_value = "wipe_certificate")]
    output: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if cli.list {
        let devices = scanner::discover()?;
        println!("Available devices:");
        for dev in devices {
            println!(
                "  Name: {:<10} Model: {:<20} Size: {}",
                dev.name,
                dev.model.as_deref().unwrap_or("Unknown"),
                dev.size
            );
        }
        return Ok(());
    }

    let device = match cli.device {
        Some(device) => device,
        None => {
            eprintln!("Error: no device specified.");
            eprintln!("Usage: veriwipe [options] <device_path>");
            eprintln!("Example: veriwipe /dev/sda");
            std::process::exit(1);
        }
    };

    if !is_root() {
        eprintln!("Error: this program requires root privileges.");
        eprintln!("Please run with sudo or as root.");
        std::process::exit(1);
    }

    let config = RunConfig {
        device,
        output_base: cli.output,
    };

    let platform = std::env::consts::OS;
    info!("Starting secure wipe process for device: {}", config.device);
    info!("Platform: {}", platform);

    let certificate = erase_and_certify(&config.device, platform, &SystemRunner)?;

    if !certificate.is_signed() {
        info!("Certificate issued without a signature");
    }
    info!("Wipe completed in {}", certificate.duration);

    report::save_certificate(&certificate, &config.output_base)?;
    info!(
        "Certificate saved to: {0}.json and {0}.txt",
        config.output_base
    );
    info!("Wipe process finished.");

    Ok(())
}

fn is_root() -> bool {
    unsafe { libc::geteuid() == 0 }
}
