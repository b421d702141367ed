mod command_buffer;
mod present;
mod upload;

use log::{debug, error, info};
use winit::{
    dpi::PhysicalSize,
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

use crate::present::Presenter;

/// The display surface the image is rendered for.
const SURFACE_SIZE: PhysicalSize<u32> = PhysicalSize {
    width: 800,
    height: 480,
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let image = match mandelbrot_texture::generate(
        SURFACE_SIZE.width.into(),
        SURFACE_SIZE.height.into(),
    ) {
        Ok(image) => image,
        Err(err) => {
            error!("failed to generate image: {}", err);
            std::process::exit(1);
        }
    };
    debug!(
        "generated {}x{} image ({} bytes)",
        image.size().width,
        image.size().height,
        image.as_bytes().len()
    );

    let event_loop = EventLoop::new();
    let window = match WindowBuilder::new()
        .with_title("mandelbrot")
        .with_inner_size(SURFACE_SIZE)
        .build(&event_loop)
    {
        Ok(window) => window,
        Err(err) => {
            error!("failed to open window: {}", err);
            std::process::exit(1);
        }
    };

    let mut presenter = match Presenter::new(&window, &image) {
        Ok(presenter) => presenter,
        Err(err) => {
            error!("{}", err);
            std::process::exit(1);
        }
    };
    // The texture owns a copy now.
    drop(image);

    info!("Begin rendering...");
    event_loop.run(move |event, _, control_flow| {
        // The image never changes, so only redraw when the window asks for it.
        *control_flow = ControlFlow::Wait;

        match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(size) => {
                    presenter.resize(size);
                    window.request_redraw();
                }
                WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                    presenter.resize(*new_inner_size);
                    window.request_redraw();
                }
                _ => {}
            },
            Event::RedrawRequested(window_id) if window_id == window.id() => {
                if let Err(err) = presenter.render() {
                    error!("{}", err);
                    *control_flow = ControlFlow::Exit;
                }
            }
            Event::LoopDestroyed => {
                info!("Exiting...");
            }
            _ => {}
        }
    });
}
