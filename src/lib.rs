//! An asynchronous SMPP 3.4 client library for the ESME role.
//!
//! The crate speaks the Short Message Peer-to-Peer protocol over TCP
//! towards an SMSC: it submits outbound SMS, receives inbound SMS and
//! delivery receipts, and keeps the session healthy with keepalives,
//! throttling back-off and automatic reconnect.
//!
//! # Layers
//!
//! * [`codec`] / [`datatypes`]: bit-exact encoding and decoding of the
//!   SMPP 3.4 PDU set, including optional parameters and user data
//!   headers.
//! * [`text`]: conversion between strings and data-coding-scheme byte
//!   encodings (GSM-7, ASCII, Latin-1, UCS-2BE), plus the delivery
//!   receipt parser.
//! * [`correlator`]: matches responses to requests by sequence number
//!   and delivery receipts to submissions by SMSC message id.
//! * [`session`]: the connection state machine with its reader, writer
//!   and timekeeper.
//! * [`esme`]: the facade composing the above with a pluggable broker,
//!   correlator and hook.
//!
//! # Example
//!
//! ```rust,no_run
//! use esme::{Esme, EsmeConfig, OutboundSms, PhoneNumber};
//!
//! #[tokio::main]
//! async fn main() -> esme::Result<()> {
//!     let config = EsmeConfig::new("smsc.example.net", 2775, "system", "password");
//!     let (mut esme, broker) = Esme::in_memory(config);
//!     let control = esme.handle();
//!
//!     tokio::spawn(async move {
//!         let sms = OutboundSms::builder()
//!             .log_id("welcome-1")
//!             .from(PhoneNumber::alphanumeric("EXAMPLE").unwrap())
//!             .to(PhoneNumber::international("447700900123").unwrap())
//!             .text("Hello from Rust")
//!             .with_delivery_receipt()
//!             .build()
//!             .unwrap();
//!         broker.enqueue(sms).await.unwrap();
//!         control.stop();
//!     });
//!
//!     esme.start().await
//! }
//! ```

pub mod codec;
pub mod connection;
pub mod correlator;
pub mod datatypes;
pub mod error;
pub mod esme;
pub mod session;
pub mod text;

mod macros;


pub use codec::{CodecError, Decodable, Encodable, Frame, PduHeader};
pub use correlator::{Correlator, DeliveryRecord, MemoryCorrelator, PendingRequest};
pub use datatypes::{DataCoding, PhoneNumber};
pub use error::EsmeError;
pub use esme::{
    BindMode, Broker, BrokerHandle, Esme, EsmeConfig, EsmeHandle, Hook, MemoryBroker, NullHook,
    OutboundSms, SmsPayload,
};
pub use session::SessionState;
pub use text::{DeliveryReceipt, ReceiptStatus};

/// A specialized `Result` type for ESME operations
pub type Result<T> = std::result::Result<T, EsmeError>;
