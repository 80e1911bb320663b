//! Admin broadcast: one operator composes a message, confirms it, and the bot
//! fans it out to every registered customer.

pub mod directory;
pub mod dispatcher;
pub mod draft;
pub mod service;
pub mod session;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use directory::{DirectoryError, Recipient, RecipientDirectory};
pub use dispatcher::{DeliveryOutcome, DeliveryReport, FanoutDispatcher};
pub use draft::DraftMessage;
pub use service::{
    BroadcastAction, BroadcastService, CANCEL_TOKEN, CONFIRM_TOKEN, ChoiceOutcome, InvokeOutcome,
    Operator,
};
pub use session::{BroadcastState, SessionKey, SessionTracker};
pub use transport::{ChoiceButton, MessageTransport, TelegramTransport, TransportError};
