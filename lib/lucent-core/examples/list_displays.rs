use lucent_core::platform::{resolve_primary, OverlayHostImpl, WinitHost};
use lucent_core::LucentEvent;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy};
use winit::window::WindowId;

struct ListDisplays {
    proxy: EventLoopProxy<LucentEvent>,
}

impl ApplicationHandler<LucentEvent> for ListDisplays {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let host = WinitHost::new(event_loop, self.proxy.clone());
        let displays = host.enumerate_displays().expect("Error listing displays");
        let primary = resolve_primary(
            &displays,
            host.primary_display_id().expect("Error getting primary display"),
        );

        for display in &displays {
            println!(
                "Display: {:?}{}",
                display.name,
                if primary == Some(display.id) { " (primary)" } else { "" }
            );
            println!(
                "\tID: {:?}\n\
                \tBounds: {:?}\n\
                \tScale: {}\n",
                display.id, display.bounds, display.scale_factor,
            );
        }

        event_loop.exit();
    }

    fn window_event(&mut self, _: &ActiveEventLoop, _: WindowId, _: WindowEvent) {}
}

fn main() {
    let event_loop = EventLoop::<LucentEvent>::with_user_event()
        .build()
        .expect("Error creating event loop");
    let proxy = event_loop.create_proxy();
    event_loop
        .run_app(&mut ListDisplays { proxy })
        .expect("Error running event loop");
}
