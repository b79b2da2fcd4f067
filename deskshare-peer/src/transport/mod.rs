mod input_channel;
mod peer_transport;
mod rtc_transport;
mod transport_config;
mod transport_event;

pub use input_channel::InputChannel;
pub use peer_transport::{Transport, TransportFactory};
pub use rtc_transport::{RtcTransport, RtcTransportFactory};
pub use transport_config::TransportConfig;
pub use transport_event::{
    EventSink, SignalingState, TransportEvent, TransportEventKind, TransportId, TransportState,
};
