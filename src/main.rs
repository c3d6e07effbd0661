use clap::Parser;
use crossbeam::channel::{unbounded, Receiver, Sender};
use crossterm::event::{
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::{execute, terminal};
use jamlink::{
    audio::{CpalSampler, NullSampler, Sampler},
    cli::{validate_device, Args},
    event_loop::{AppEvent, EventLoop},
    handle_device_list,
    keyboard::run_keyboard_input,
    midi::{run_midi_input, MidirEngine},
    net::TcpLink,
    session::{create_shared_session, SharedSession},
    ui::Console,
};
use log::{error, info, warn};
use std::io::stdout;

fn main() {
    initialize_logging();
    let args = Args::parse();

    if args.device_list {
        list_available_devices(&handle_device_list());
        return;
    }

    if let Some(device_name) = &args.bind_to_device {
        if let Err(error_msg) = validate_device(device_name, &handle_device_list()) {
            error!("{}", error_msg);
            eprintln!("{}", error_msg);
            std::process::exit(1);
        }
    }

    let session = create_shared_session(args.harmonize);
    let console = Console::new();
    let (event_tx, event_rx) = unbounded();

    attach_midi_input(&args, &console, event_tx.clone());
    let link = attach_peer_link(&args, &console, event_tx.clone());

    setup_terminal(&console);
    let _ = run_keyboard_input(event_tx);

    match CpalSampler::new() {
        Ok(sampler) => run_session(sampler, session, event_rx, link, console, args.channel),
        Err(err) => {
            warn!("{}", err);
            console.log(&format!("{} - running silent", err));
            run_session(
                NullSampler::new(),
                session,
                event_rx,
                link,
                console,
                args.channel,
            )
        }
    }

    restore_terminal();
    info!("Session ended");
}

fn initialize_logging() {
    jamlink::logging::init_logger().expect("Logger initialization failed");
    info!("Application starting");
}

fn list_available_devices(devices: &[String]) {
    println!("Available MIDI devices:");
    for device in devices {
        println!("  - {}", device);
    }
}

/// Binds the MIDI input and starts its pump. Missing devices degrade to
/// keyboard-fallback mode rather than aborting.
fn attach_midi_input(args: &Args, console: &Console, events: Sender<AppEvent>) {
    match MidirEngine::new(args.bind_to_device.clone()) {
        Ok(engine) => {
            info!("MIDI input bound to {}", engine.port_name());
            console.log(&format!("MIDI input: {}", engine.port_name()));
            let _ = run_midi_input(engine, events);
        }
        Err(err) => {
            warn!("MIDI input unavailable: {}", err);
            console.log(&format!("{} - keyboard fallback active", err));
        }
    }
}

/// Brings up the peer link per the CLI arguments. Failure is surfaced and
/// the session continues without networking.
fn attach_peer_link(args: &Args, console: &Console, events: Sender<AppEvent>) -> Option<TcpLink> {
    let attempt = if let Some(addr) = &args.peer {
        Some(TcpLink::connect(addr, events))
    } else if let Some(addr) = &args.listen {
        Some(TcpLink::accept(addr, events))
    } else {
        None
    };

    match attempt {
        Some(Ok(link)) => {
            console.log(&format!("peer link up: {}", link.peer_addr()));
            Some(link)
        }
        Some(Err(err)) => {
            error!("Peer link failed: {}", err);
            console.log(&format!("peer link failed: {}", err));
            None
        }
        None => {
            info!("No peer configured, playing solo");
            None
        }
    }
}

fn setup_terminal(console: &Console) {
    if let Err(err) = terminal::enable_raw_mode() {
        warn!("Could not enable raw mode: {}", err);
        return;
    }
    match terminal::supports_keyboard_enhancement() {
        Ok(true) => {
            let _ = execute!(
                stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            );
        }
        _ => {
            console.log("terminal does not report key releases; keyboard notes will not stop");
        }
    }
}

fn restore_terminal() {
    let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
    let _ = terminal::disable_raw_mode();
}

fn run_session<S: Sampler>(
    sampler: S,
    session: SharedSession,
    events: Receiver<AppEvent>,
    link: Option<TcpLink>,
    console: Console,
    channel: u8,
) {
    let mut event_loop = EventLoop::new(session, events, sampler, link, console, channel);
    event_loop.run();
}
