//! Effect handlers.
//!
//! Each handler is a plain async function that performs one store call and
//! returns the completion `UiEvent`. The runtime spawns them and forwards the
//! result to the inbox.

use evm_core::EventBook;
use evm_kv::KvStore;

use crate::events::UiEvent;

pub async fn load_events<S: KvStore>(book: EventBook<S>) -> UiEvent {
    UiEvent::EventsLoaded(book.list().await.map_err(|e| e.to_string()))
}

pub async fn add_event<S: KvStore>(book: EventBook<S>, name: String) -> UiEvent {
    let result = book.add(&name).await.map_err(|e| e.to_string());
    UiEvent::EventAdded { name, result }
}

pub async fn save_event<S: KvStore>(book: EventBook<S>, id: String, name: String) -> UiEvent {
    let result = book.rename(&id, &name).await.map_err(|e| e.to_string());
    UiEvent::EventSaved { id, name, result }
}

pub async fn delete_event<S: KvStore>(book: EventBook<S>, id: String) -> UiEvent {
    let result = book.remove(&id).await.map_err(|e| e.to_string());
    UiEvent::EventDeleted { id, result }
}
