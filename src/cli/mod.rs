use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// List available MIDI devices
    #[arg(long)]
    pub device_list: bool,

    /// Bind to a specific MIDI input device (first available when omitted)
    #[arg(long)]
    pub bind_to_device: Option<String>,

    /// Connect to a peer at host:port
    #[arg(long, conflicts_with = "listen")]
    pub peer: Option<String>,

    /// Wait for one peer to connect on host:port
    #[arg(long)]
    pub listen: Option<String>,

    /// MIDI channel stamped onto keyboard-synthesized notes
    #[arg(long, default_value_t = 0)]
    pub channel: u8,

    /// Start with the remote echo harmonizer enabled
    #[arg(long)]
    pub harmonize: bool,
}

pub fn handle_device_list() -> Vec<String> {
    // Re-export from the crate root
    crate::handle_device_list()
}

pub fn validate_device(device_name: &str, devices: &[String]) -> Result<(), String> {
    if !devices.iter().any(|d| d.contains(device_name)) {
        let mut error_msg = format!(
            "Error: Device '{}' not found in available devices:\n",
            device_name
        );
        for device in devices {
            error_msg.push_str(&format!("  - {}\n", device));
        }
        return Err(error_msg);
    }
    Ok(())
}
