//! Wish Card entry point
//!
//! Binds the page's markup to the `Greeting` controller, forwards browser
//! events and applies DOM updates once per animation frame.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_card {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;
    use wasm_bindgen::convert::FromWasmAbi;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        DeviceOrientationEvent, Document, Element, EventTarget, HtmlAudioElement, HtmlElement,
        HtmlIFrameElement, IntersectionObserver, IntersectionObserverEntry,
        IntersectionObserverInit, MouseEvent,
    };

    use wish_card::audio::{MediaPlayback, Playback, SilentPlayback};
    use wish_card::card::{RevealGate, Viewport};
    use wish_card::{CardError, ClickTarget, DomOp, ElementId, Greeting, Result, Role, Settings, Stage};

    /// Selector for clicks that must not spawn sparkles
    const CONTROL_SELECTOR: &str = "button, a";
    const AUDIO_ID: &str = "bg-music";
    /// Frame step used before a previous timestamp exists
    const FIRST_FRAME_DT: f32 = 1.0 / 60.0;

    /// Page instance: controller plus the real nodes behind each stage id
    struct Page {
        greeting: Greeting,
        document: Document,
        nodes: HashMap<ElementId, Element>,
        media: Box<dyn Playback>,
        last_time: f64,
    }

    impl Page {
        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                FIRST_FRAME_DT
            };
            self.last_time = time;

            let ops = self.greeting.frame(dt);
            for op in ops {
                if let Err(e) = self.apply(op) {
                    log::warn!("DOM update failed: {}", e);
                }
            }
        }

        fn apply(&mut self, op: DomOp) -> Result<()> {
            match op {
                DomOp::Create { id, role, parent } => {
                    let el = self.document.create_element("div").map_err(js_err)?;
                    if let Some(class) = role.class_name() {
                        el.set_class_name(class);
                    }
                    match parent.and_then(|p| self.nodes.get(&p)) {
                        Some(parent) => parent.append_child(&el).map_err(js_err)?,
                        None => self
                            .document
                            .body()
                            .ok_or(CardError::MissingElement("body"))?
                            .append_child(&el)
                            .map_err(js_err)?,
                    };
                    self.nodes.insert(id, el);
                }
                DomOp::Remove { id } => {
                    if let Some(el) = self.nodes.remove(&id) {
                        el.remove();
                    }
                }
                DomOp::Style { id, name, value } => {
                    if let Some(el) = self.node(id).and_then(|el| el.dyn_ref::<HtmlElement>()) {
                        let style = el.style();
                        if value.is_empty() {
                            style.remove_property(name).map_err(js_err)?;
                        } else {
                            style.set_property(name, &value).map_err(js_err)?;
                        }
                    }
                }
                DomOp::AddClass { id, class } => {
                    if let Some(el) = self.node(id) {
                        el.class_list().add_1(class).map_err(js_err)?;
                    }
                }
                DomOp::RemoveClass { id, class } => {
                    if let Some(el) = self.node(id) {
                        el.class_list().remove_1(class).map_err(js_err)?;
                    }
                }
                DomOp::Text { id, text } => {
                    if let Some(el) = self.node(id) {
                        el.set_text_content(Some(&text));
                    }
                }
                DomOp::ReloadFrame { id } => {
                    if let Some(frame) = self.node(id).and_then(|el| el.dyn_ref::<HtmlIFrameElement>()) {
                        let src = frame.src();
                        frame.set_src("");
                        frame.set_src(&src);
                    }
                }
            }
            Ok(())
        }

        fn node(&self, id: ElementId) -> Option<&Element> {
            self.nodes.get(&id)
        }

        fn node_for(&self, role: Role) -> Option<Element> {
            self.greeting
                .stage()
                .find(role)
                .and_then(|id| self.nodes.get(&id).cloned())
        }
    }

    fn js_err(e: JsValue) -> CardError {
        CardError::Js(format!("{:?}", e))
    }

    fn viewport(window: &web_sys::Window) -> Viewport {
        let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Viewport::new(width as f32, height as f32)
    }

    /// Adopt every markup node into the stage, keyed by its new id
    fn adopt_markup(document: &Document, stage: &mut Stage) -> Result<HashMap<ElementId, Element>> {
        let mut nodes = HashMap::new();
        for role in Role::MARKUP {
            let Some(selector) = role.selector() else {
                continue;
            };
            let list = document.query_selector_all(selector).map_err(js_err)?;
            for i in 0..list.length() {
                if let Some(el) = list.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                    nodes.insert(stage.adopt(role), el);
                }
            }
        }
        Ok(nodes)
    }

    pub fn run() -> Result<()> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Wish Card starting...");

        let window = web_sys::window().ok_or(CardError::Js("no window".into()))?;
        let document = window.document().ok_or(CardError::Js("no document".into()))?;

        let settings = Settings::load();
        let mut stage = Stage::new();
        let nodes = adopt_markup(&document, &mut stage)?;

        let seed = js_sys::Date::now() as u64;
        let greeting = Greeting::new(settings, stage, viewport(&window), seed)?;
        log::info!("Card initialized with seed: {}", seed);

        let media: Box<dyn Playback> = match document
            .get_element_by_id(AUDIO_ID)
            .and_then(|el| el.dyn_into::<HtmlAudioElement>().ok())
        {
            Some(audio) => Box::new(MediaPlayback::new(audio)),
            None => {
                log::warn!("No #{} audio element, music disabled", AUDIO_ID);
                Box::new(SilentPlayback)
            }
        };

        let page = Rc::new(RefCell::new(Page {
            greeting,
            document: document.clone(),
            nodes,
            media,
            last_time: 0.0,
        }));

        page.borrow_mut().greeting.on_ready();

        setup_window_handlers(&window, &document, page.clone());
        setup_pointer_handlers(&document, page.clone());
        setup_buttons(&document, page.clone());
        setup_reveal_observer(page.clone())?;

        request_animation_frame(page);

        log::info!("Wish Card running!");
        Ok(())
    }

    fn listen<E>(target: &EventTarget, name: &str, handler: impl FnMut(E) + 'static)
    where
        E: FromWasmAbi + 'static,
    {
        let closure = Closure::<dyn FnMut(E)>::new(handler);
        if let Err(e) = target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref()) {
            log::warn!("Failed to listen for {}: {:?}", name, e);
        }
        closure.forget();
    }

    fn setup_window_handlers(window: &web_sys::Window, document: &Document, page: Rc<RefCell<Page>>) {
        // Load may already be behind us by the time the module starts
        if document.ready_state() == "complete" {
            page.borrow_mut().greeting.on_load();
        } else {
            let page = page.clone();
            listen(window, "load", move |_event: web_sys::Event| {
                page.borrow_mut().greeting.on_load();
            });
        }

        {
            let page = page.clone();
            listen(window, "resize", move |_event: web_sys::Event| {
                if let Some(window) = web_sys::window() {
                    let vp = viewport(&window);
                    page.borrow_mut().greeting.on_resize(vp.width, vp.height);
                }
            });
        }

        {
            let page = page.clone();
            listen(window, "deviceorientation", move |event: DeviceOrientationEvent| {
                page.borrow_mut().greeting.on_orientation(
                    event.beta().map(|b| b as f32),
                    event.gamma().map(|g| g as f32),
                );
            });
        }

        listen(window, "pagehide", move |_event: web_sys::Event| {
            page.borrow_mut().greeting.teardown();
        });
    }

    fn setup_pointer_handlers(document: &Document, page: Rc<RefCell<Page>>) {
        {
            let page = page.clone();
            listen(document, "mousemove", move |event: MouseEvent| {
                page.borrow_mut()
                    .greeting
                    .on_pointer_move(event.client_x() as f32, event.client_y() as f32);
            });
        }

        {
            let page = page.clone();
            listen(document, "mouseleave", move |_event: MouseEvent| {
                page.borrow_mut().greeting.on_pointer_leave();
            });
        }

        listen(document, "click", move |event: MouseEvent| {
            let on_control = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest(CONTROL_SELECTOR).ok().flatten())
                .is_some();
            let target = if on_control {
                ClickTarget::Control
            } else {
                ClickTarget::Surface
            };
            page.borrow_mut()
                .greeting
                .on_click(event.client_x() as f32, event.client_y() as f32, target);
        });
    }

    fn setup_buttons(document: &Document, page: Rc<RefCell<Page>>) {
        let actions: [(&str, fn(&mut Page)); 7] = [
            ("open", |p| {
                p.greeting.open_card();
            }),
            ("close", |p| {
                p.greeting.close_card();
            }),
            ("replay-btn", |p| p.greeting.replay()),
            ("music-toggle", |p| {
                p.greeting.toggle_music(p.media.as_mut());
            }),
            ("heart-trigger", |p| p.greeting.heart_tap()),
            ("launch-fun", |p| p.greeting.open_modal()),
            ("close-modal", |p| p.greeting.close_modal()),
        ];

        for (id, action) in actions {
            match document.get_element_by_id(id) {
                Some(btn) => {
                    let page = page.clone();
                    listen(&btn, "click", move |_event: MouseEvent| {
                        action(&mut page.borrow_mut());
                    });
                }
                None => log::debug!("No #{} button on this page", id),
            }
        }
    }

    fn setup_reveal_observer(page: Rc<RefCell<Page>>) -> Result<()> {
        let Some(section) = page.borrow().node_for(Role::SurpriseSection) else {
            return Ok(());
        };

        let callback = {
            let page = page.clone();
            Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
                move |entries: js_sys::Array, observer: IntersectionObserver| {
                    for entry in entries.iter() {
                        let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                            continue;
                        };
                        let revealed = page.borrow_mut().greeting.on_intersection(
                            entry.is_intersecting(),
                            entry.intersection_ratio() as f32,
                        );
                        if revealed {
                            observer.unobserve(&entry.target());
                        }
                    }
                },
            )
        };

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(RevealGate::DEFAULT_THRESHOLD as f64));
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
                .map_err(js_err)?;
        observer.observe(&section);
        callback.forget();
        Ok(())
    }

    fn request_animation_frame(page: Rc<RefCell<Page>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            card_loop(page, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn card_loop(page: Rc<RefCell<Page>>, time: f64) {
        page.borrow_mut().frame(time);
        request_animation_frame(page);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_card::run() {
        log::error!("Wish Card failed to start: {}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> wish_card::Result<()> {
    env_logger::init();
    log::info!("Wish Card (native) starting...");
    log::info!("Native mode runs a headless walkthrough - serve the wasm build for the real page");

    headless_walkthrough()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive the controller through a typical visit without a browser
#[cfg(not(target_arch = "wasm32"))]
fn headless_walkthrough() -> wish_card::Result<()> {
    use wish_card::audio::SilentPlayback;
    use wish_card::card::{Markup, Viewport};
    use wish_card::{ClickTarget, Greeting, Settings, Stage};

    const DT: f32 = 1.0 / 60.0;

    let mut stage = Stage::new();
    Markup::build(&mut stage, 4, 3)?;
    let mut greeting = Greeting::new(Settings::load(), stage, Viewport::new(1440.0, 900.0), 7)?;

    fn run(g: &mut Greeting, secs: f32) -> usize {
        let mut ops = 0;
        for _ in 0..(secs / DT).round() as usize {
            ops += g.frame(DT).len();
        }
        ops
    }

    greeting.on_ready();
    greeting.on_load();
    let ops = run(&mut greeting, 5.0);
    log::info!("Entrance {:?} after {} DOM updates", greeting.entrance_phase(), ops);

    greeting.on_pointer_move(200.0, 150.0);
    greeting.open_card();
    run(&mut greeting, 8.0);
    log::info!(
        "Card {:?}, ending shown: {}",
        greeting.card_state(),
        greeting.ending_active()
    );

    let sparkles = greeting.on_click(720.0, 450.0, ClickTarget::Surface);
    greeting.heart_tap();
    greeting.toggle_music(&mut SilentPlayback);
    log::info!(
        "{} sparkles from click, {} live, music playing: {}",
        sparkles,
        greeting.live_sparkles(),
        greeting.music_playing()
    );

    greeting.close_card();
    run(&mut greeting, 4.0);
    log::info!(
        "Card {:?}, {} particles, {} sparkles left",
        greeting.card_state(),
        greeting.particle_count(),
        greeting.live_sparkles()
    );

    println!("✓ Headless walkthrough finished");
    Ok(())
}
