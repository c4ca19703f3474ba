use anyhow::{anyhow, Result};
use std::future::Future;
use wasm_bindgen::closure::{Closure, WasmClosure, WasmClosureFnOnce};
use wasm_bindgen::JsCast;

#[rustfmt::skip]
use web_sys::{
    Document,
    Window,
    CanvasRenderingContext2d,
    HtmlCanvasElement,
    HtmlImageElement,
    KeyboardEvent,
};

// ==================== Constants ====================
// Constants related to HTML elements
mod html {
    pub const CANVAS_ID: &str = "canvas";
    pub const CANVAS_TAG: &str = "canvas";
    pub const CONTEXT_2D: &str = "2d";
    pub const KEYUP: &str = "keyup";
}

/// Closure handed to `requestAnimationFrame`, receives the frame timestamp
/// in milliseconds.
pub type LoopClosure = Closure<dyn FnMut(f64)>;

pub fn window() -> Result<Window> {
    web_sys::window().ok_or_else(|| anyhow!("Window not found"))
}

pub fn document() -> Result<Document> {
    window()?
        .document()
        .ok_or_else(|| anyhow!("No Document Found"))
}

/// Create the game canvas and append it to the document body.
/// - the canvas gets `html::CANVAS_ID` so `canvas()` can find it again
/// - a second call reuses the existing element and only resizes it
pub fn create_canvas(width: u32, height: u32) -> Result<HtmlCanvasElement> {
    if let Ok(existing) = canvas() {
        existing.set_width(width);
        existing.set_height(height);
        return Ok(existing);
    }

    let document = document()?;
    let canvas = document
        .create_element(html::CANVAS_TAG)
        .map_err(|err| anyhow!("Could not create canvas element : {:#?}", err))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|element| anyhow!("Error converting {:#?} to HtmlCanvasElement", element))?;
    canvas.set_id(html::CANVAS_ID);
    canvas.set_width(width);
    canvas.set_height(height);

    document
        .body()
        .ok_or_else(|| anyhow!("No body element to attach the canvas to"))?
        .append_child(&canvas)
        .map_err(|err| anyhow!("Could not append canvas to body : {:#?}", err))?;

    Ok(canvas)
}

pub fn canvas() -> Result<HtmlCanvasElement> {
    document()?
        .get_element_by_id(html::CANVAS_ID)
        .ok_or_else(|| anyhow!("No Canvas Element found with ID : '{:#?}'", html::CANVAS_ID))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|element| anyhow!("Error converting {:#?} to HtmlCanvasElement", element))
}

pub fn context() -> Result<CanvasRenderingContext2d> {
    canvas()?
        .get_context(html::CONTEXT_2D)
        // Result<Option<Object>, JsValue>
        // - JsValue error becomes an anyhow error
        // - None becomes an anyhow error
        .map_err(|js_value| anyhow!("Error getting context : {:#?}", js_value))?
        .ok_or_else(|| anyhow!("No 2d context found"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|element| {
            anyhow!(
                "Error converting {:#?} to CanvasRenderingContext2d",
                element
            )
        })
}

pub fn create_html_image_element() -> Result<HtmlImageElement> {
    HtmlImageElement::new()
        .map_err(|err| anyhow!("Could not create image element : {:#?}", err))
}

pub fn closure_once<F, A, R>(f: F) -> Closure<F::FnMut>
where
    F: 'static + WasmClosureFnOnce<A, R>,
{
    Closure::once(f)
}

pub fn closure_wrap<T: WasmClosure + ?Sized>(data: Box<T>) -> Closure<T> {
    Closure::wrap(data)
}

pub fn create_raf_closure(f: impl FnMut(f64) + 'static) -> LoopClosure {
    closure_wrap(Box::new(f) as Box<dyn FnMut(f64)>)
}

pub fn request_animation_frame(callback: &LoopClosure) -> Result<i32> {
    window()?
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .map_err(|err| anyhow!("Cannot request animation frame : {:#?}", err))
}

/// Milliseconds on the same clock `requestAnimationFrame` timestamps use.
pub fn now() -> Result<f64> {
    Ok(window()?
        .performance()
        .ok_or_else(|| anyhow!("Performance object not found"))?
        .now())
}

/// Listen for `keyup` on the document for the lifetime of the page.
/// `handler` receives the raw key code of every released key.
pub fn on_keyup(mut handler: impl FnMut(u32) + 'static) -> Result<()> {
    let listener = closure_wrap(Box::new(move |event: KeyboardEvent| {
        handler(event.key_code());
    }) as Box<dyn FnMut(KeyboardEvent)>);

    document()?
        .add_event_listener_with_callback(html::KEYUP, listener.as_ref().unchecked_ref())
        .map_err(|err| anyhow!("Could not listen for {} : {:#?}", html::KEYUP, err))?;

    // listener lives as long as the page does
    listener.forget();
    Ok(())
}

pub fn spawn_local<F>(future: F)
where
    F: Future<Output = ()> + 'static,
{
    wasm_bindgen_futures::spawn_local(future);
}
