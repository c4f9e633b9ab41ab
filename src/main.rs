use color_eyre::{eyre::eyre, Result};
use keybinder::controller::{Clock, InputDevice};
use keybinder::input::codes;
use keybinder::{
    key, BindingProfile, EventChannel, FrameDriver, InputFilter, InputSettings, Key, Modifiers,
    Placement,
};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

const FRAME_MS: u64 = 16;

fn main() -> Result<()> {
    setup()?;

    let mut args = std::env::args().skip(1);
    let settings_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(InputSettings::default_path);
    let settings = InputSettings::load_or_default(&settings_path)?;

    let profile = match args.next() {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| eyre!("Failed to read binding profile {}: {}", path, e))?;
            BindingProfile::from_toml(&content)?
        }
        None => default_profile(),
    };

    run(settings, profile)
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .init();
}

fn default_profile() -> BindingProfile {
    let mut profile = BindingProfile::default();
    let mut bind = |name: &str, keys: Vec<Key>| {
        profile.bindings.insert(name.to_string(), keys);
    };
    bind(
        "jump",
        vec![key(codes::KEY_SPACE), Key::any_gamepad(codes::GAMEPAD_A)],
    );
    bind(
        "left",
        vec![
            key(codes::KEY_A),
            key(codes::KEY_LEFT),
            Key::any_gamepad(codes::GAMEPAD_AXIS_LEFT),
        ],
    );
    bind(
        "right",
        vec![
            key(codes::KEY_D),
            key(codes::KEY_RIGHT),
            Key::any_gamepad(codes::GAMEPAD_AXIS_RIGHT),
        ],
    );
    profile
}

fn attach<D: InputDevice, C: Clock>(driver: &mut FrameDriver<D, C>, profile: &BindingProfile) {
    driver.bindings_mut().apply_profile(profile);

    driver.subscribe(
        EventChannel::KeyDown,
        InputFilter::any(),
        Placement::Back,
        |event| match &event.virtual_key {
            Some(name) => info!("{} down ({})", name, event.physical_key),
            None => info!("{} down", event.physical_key),
        },
    );

    driver.set_tick_handler_from_settings(|tick| {
        if tick.triggered_once("jump", Modifiers::NONE) {
            info!("Tick {}: jump", tick.tick());
        }
    });
}

#[cfg(feature = "gilrs-backend")]
fn run(settings: InputSettings, profile: BindingProfile) -> Result<()> {
    use keybinder::controller::{GilrsDevice, SteadyClock};

    let slots = settings.joystick_slots.unwrap_or(4);
    let device = GilrsDevice::create(slots)?.initialize();
    let mut driver = FrameDriver::with_settings(device, SteadyClock::new(), settings)?;
    attach(&mut driver, &profile);

    info!("Polling gamepads, press Ctrl+C to quit");
    loop {
        driver.poll();
        std::thread::sleep(std::time::Duration::from_millis(FRAME_MS));
    }
}

/// Without a hardware backend, replays a short scripted session.
#[cfg(not(feature = "gilrs-backend"))]
fn run(settings: InputSettings, profile: BindingProfile) -> Result<()> {
    use keybinder::controller::{JoystickSnapshot, ManualClock, ScriptedDevice};

    let settings = InputSettings {
        tick_interval_ms: settings.tick_interval_ms.or(Some(FRAME_MS)),
        ..settings
    };
    let mut driver = FrameDriver::with_settings(ScriptedDevice::new(), ManualClock::new(), settings)?;
    attach(&mut driver, &profile);

    info!("No gamepad backend compiled in, replaying a scripted session");
    for frame in 0..120u64 {
        let device = driver.device_mut();
        match frame {
            10 => device.press(key(codes::KEY_SPACE)),
            14 => device.release(key(codes::KEY_SPACE)),
            30 => device.set_joystick(
                0,
                JoystickSnapshot {
                    axes: vec![-0.9, 0.0],
                    buttons: Vec::new(),
                },
            ),
            45 => device.set_axis(0, 0, 0.0),
            60 => device.set_button(0, codes::GAMEPAD_A as usize, true),
            61 => device.set_button(0, codes::GAMEPAD_A as usize, false),
            _ => {}
        }
        driver.clock_mut().advance(FRAME_MS);
        driver.poll();

        if driver.pressed("left", Modifiers::NONE) && driver.triggered("left", Modifiers::NONE) {
            info!("Frame {}: started moving left", frame);
        }
    }

    info!(
        "Replayed {} frames, {} ticks, {:.1} fps",
        driver.frame_count(),
        driver.tick_count(),
        driver.fps()
    );
    Ok(())
}
