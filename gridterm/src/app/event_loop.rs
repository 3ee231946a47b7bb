use super::demo::DemoApp;
use super::state::LoopEvent;
use super::App;
use anyhow::Result;
use gridterm_core::{key_channel, GameLoop, KeyPress};
use log::{error, info};
use std::thread;
use winit::{
    event::{Event, WindowEvent},
    event_loop::ControlFlow,
    keyboard::ModifiersState,
};

impl App {
    /// Run the application
    ///
    /// The frame loop runs on its own thread; this thread services the window
    /// and only forwards resize, close and key events to it.
    pub fn run(self) -> Result<()> {
        let App {
            config,
            event_loop,
            window,
            font,
            screen,
            coalescer,
            mut renderer,
            run_flag,
        } = self;

        let (key_tx, key_rx) = key_channel();
        let proxy = event_loop.create_proxy();

        let frame_thread = {
            let screen = screen.clone();
            let coalescer = coalescer.clone();
            let mut game_loop = GameLoop::new(config.loop_config(), run_flag.clone()).with_keys(key_rx);
            let mut demo = DemoApp::new(screen.clone(), coalescer.clone());

            thread::Builder::new()
                .name("frame-loop".to_string())
                .spawn(move || {
                    let result = game_loop.run(
                        &mut demo,
                        &screen,
                        &mut renderer,
                        font.as_ref(),
                        Some(coalescer.as_ref()),
                    );
                    if let Err(e) = &result {
                        error!("Frame loop failed: {:#}", e);
                    }
                    if proxy.send_event(LoopEvent::Exited).is_err() {
                        info!("Window event loop already closed");
                    }
                    result.map(|_| ())
                })?
        };

        let mut modifiers = ModifiersState::empty();

        info!("Starting event loop");

        event_loop.run(move |event, elwt| {
            elwt.set_control_flow(ControlFlow::Wait);

            match event {
                Event::WindowEvent {
                    event: WindowEvent::CloseRequested,
                    ..
                } => {
                    info!("Close requested");
                    run_flag.stop();
                }

                Event::WindowEvent {
                    event: WindowEvent::ModifiersChanged(new_modifiers),
                    ..
                } => {
                    modifiers = new_modifiers.state();
                }

                Event::WindowEvent {
                    event: WindowEvent::Resized(size),
                    ..
                } => {
                    super::window::handle_resize(size, &coalescer);
                }

                Event::WindowEvent {
                    event: WindowEvent::KeyboardInput { event, .. },
                    ..
                } => {
                    if let Some(key) = KeyPress::from_event(&event, modifiers) {
                        key_tx.send(key);
                    }
                }

                Event::UserEvent(LoopEvent::Exited) => {
                    info!("Frame loop exited, closing window");
                    window.set_visible(false);
                    elwt.exit();
                }

                _ => {}
            }
        })?;

        frame_thread
            .join()
            .map_err(|_| anyhow::anyhow!("Frame loop thread panicked"))?
    }
}
