use accutrace::{
    input::{Action, KeyboardState},
    settings::{CliArgs, Settings, HELP},
    App,
};
use accutrace_scene::example_scenes;
use anyhow::Context;
use std::sync::Arc;
use winit::{
    dpi::PhysicalSize,
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::EventLoop,
    keyboard::PhysicalKey,
    window::WindowBuilder,
};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse(pico_args::Arguments::from_env())?;
    if args.help {
        print!("{}", HELP);
        return Ok(());
    }
    let settings = Settings::from_args(&args)?;

    let (camera, scene) = example_scenes::by_name(&settings.scene, &settings.assets_dir)
        .with_context(|| format!("Cannot build scene '{}'", settings.scene))?;

    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("AccuTrace")
            .with_inner_size(PhysicalSize::new(settings.width, settings.height))
            .build(&event_loop)
            .context("Could not create window")?,
    );

    let mut app = App::new(window.clone(), &settings, camera, scene)?;
    let mut keyboard = KeyboardState::default();

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::Resized(size) => app.resize(size),
            WindowEvent::Focused(false) => keyboard.release_all(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => keyboard.handle_key(code, state == ElementState::Pressed, repeat),
            WindowEvent::RedrawRequested => {
                if keyboard.pressed().contains(&Action::Quit) {
                    elwt.exit();
                    return;
                }
                match app.render(&keyboard.movement(), keyboard.pressed()) {
                    Ok(true) => keyboard.clear_pressed(),
                    Ok(false) => {}
                    Err(error) => {
                        log::error!("{:#}", error);
                        elwt.exit();
                    }
                }
            }
            _ => {}
        },
        Event::AboutToWait => window.request_redraw(),
        _ => {}
    })?;

    Ok(())
}
