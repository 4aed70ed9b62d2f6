//! Live Query Feed
//!
//! Browser `EventSource` on the gateway's snapshot stream. Each `snapshot`
//! event carries the whole list, newest first.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventSource, MessageEvent};

use crate::models::Todo;

const SNAPSHOT_EVENT: &str = "snapshot";

/// Open subscription. Dropping it closes the stream and releases the callbacks.
pub struct LiveFeed {
    source: EventSource,
    _on_snapshot: Closure<dyn FnMut(MessageEvent)>,
    _on_error: Closure<dyn FnMut(Event)>,
}

impl LiveFeed {
    pub fn open(url: &str, mut on_snapshot: impl FnMut(Vec<Todo>) + 'static) -> Result<Self, String> {
        let source = EventSource::new(url).map_err(|e| format!("{:?}", e))?;

        let on_message = Closure::<dyn FnMut(MessageEvent)>::new(move |ev: MessageEvent| {
            let Some(data) = ev.data().as_string() else {
                return;
            };
            match parse_snapshot(&data) {
                Ok(items) => on_snapshot(items),
                Err(e) => {
                    web_sys::console::error_1(&format!("[FEED] Bad snapshot: {}", e).into())
                }
            }
        });
        source
            .add_event_listener_with_callback(SNAPSHOT_EVENT, on_message.as_ref().unchecked_ref())
            .map_err(|e| format!("{:?}", e))?;

        // The last snapshot stays on screen
        let on_error = Closure::<dyn FnMut(Event)>::new(move |_ev: Event| {
            web_sys::console::error_1(&"[FEED] Realtime update error".into());
        });
        source.set_onerror(Some(on_error.as_ref().unchecked_ref()));

        Ok(Self {
            source,
            _on_snapshot: on_message,
            _on_error: on_error,
        })
    }
}

impl Drop for LiveFeed {
    fn drop(&mut self) {
        self.source.set_onerror(None);
        self.source.close();
    }
}

pub fn parse_snapshot(data: &str) -> Result<Vec<Todo>, serde_json::Error> {
    serde_json::from_str(data)
}
