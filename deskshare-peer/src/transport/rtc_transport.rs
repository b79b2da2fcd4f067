use crate::transport::{
    EventSink, SignalingState, Transport, TransportConfig, TransportEventKind, TransportFactory,
    TransportState,
};
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use bytes::Bytes;
use deskshare_core::utils::INPUT_CHANNEL_LABEL;
use deskshare_core::{IceCandidate, IceServerConfig, SdpKind, SessionDescription};
use std::sync::Arc;
use tracing::{debug, info, warn};
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::api::{API, APIBuilder};
use webrtc::data_channel::RTCDataChannel;
use webrtc::data_channel::data_channel_init::RTCDataChannelInit;
use webrtc::data_channel::data_channel_message::DataChannelMessage;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::sdp_type::RTCSdpType;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::peer_connection::signaling_state::RTCSignalingState;
use webrtc::track::track_local::TrackLocal;

/// Builds webrtc-rs peer connections sharing one media engine and interceptor set.
pub struct RtcTransportFactory {
    api: API,
    local_tracks: Vec<Arc<dyn TrackLocal + Send + Sync>>,
}

impl RtcTransportFactory {
    pub fn new() -> Result<Self> {
        // Codecs are registered even for data-only sessions.
        let mut media_engine = MediaEngine::default();
        media_engine.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut media_engine)?;

        let api = APIBuilder::new()
            .with_media_engine(media_engine)
            .with_interceptor_registry(registry)
            .build();

        Ok(Self {
            api,
            local_tracks: Vec::new(),
        })
    }

    /// Attach `track` to every transport created from now on.
    pub fn with_local_track(mut self, track: Arc<dyn TrackLocal + Send + Sync>) -> Self {
        self.local_tracks.push(track);
        self
    }
}

#[async_trait]
impl TransportFactory for RtcTransportFactory {
    async fn create(
        &self,
        config: &TransportConfig,
        events: EventSink,
    ) -> Result<Arc<dyn Transport>> {
        let transport = RtcTransport::new(&self.api, config, events).await?;

        for track in &self.local_tracks {
            transport
                .peer_connection
                .add_track(Arc::clone(track))
                .await
                .context("Failed to attach local track")?;
        }

        Ok(Arc::new(transport))
    }
}

pub struct RtcTransport {
    peer_connection: Arc<RTCPeerConnection>,
    events: EventSink,
}

impl RtcTransport {
    async fn new(api: &API, config: &TransportConfig, events: EventSink) -> Result<Self> {
        let rtc_config = RTCConfiguration {
            ice_servers: config.ice_servers.iter().map(to_rtc_ice_server).collect(),
            ..Default::default()
        };

        let peer_connection = Arc::new(
            api.new_peer_connection(rtc_config)
                .await
                .context("Failed to create peer connection")?,
        );

        let state_sink = events.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let sink = state_sink.clone();

                Box::pin(async move {
                    info!("Transport state for {}: {}", sink.remote(), s);
                    if let Some(state) = to_transport_state(s) {
                        sink.emit(TransportEventKind::StateChanged(state));
                    }
                })
            },
        ));

        let ice_sink = events.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let sink = ice_sink.clone();

            Box::pin(async move {
                let Some(candidate) = c else { return };
                match candidate.to_json() {
                    Ok(init) => {
                        sink.emit(TransportEventKind::CandidateGathered(from_rtc_candidate(
                            init,
                        )));
                    }
                    Err(e) => warn!("Failed to serialize local candidate: {}", e),
                }
            })
        }));

        let dc_sink = events.clone();
        peer_connection.on_data_channel(Box::new(move |dc: Arc<RTCDataChannel>| {
            let sink = dc_sink.clone();

            Box::pin(async move {
                if dc.label() != INPUT_CHANNEL_LABEL {
                    debug!(
                        "Ignoring data channel '{}' from {}",
                        dc.label(),
                        sink.remote()
                    );
                    return;
                }
                debug!("Input channel announced by {}", sink.remote());
                wire_channel(&dc, sink);
            })
        }));

        let track_sink = events.clone();
        peer_connection.on_track(Box::new(move |track, _receiver, _transceiver| {
            let sink = track_sink.clone();

            Box::pin(async move {
                info!("Remote track {} from {}", track.id(), sink.remote());
                sink.emit(TransportEventKind::RemoteTrack(track));
            })
        }));

        Ok(Self {
            peer_connection,
            events,
        })
    }
}

#[async_trait]
impl Transport for RtcTransport {
    async fn create_offer(&self) -> Result<SessionDescription> {
        let offer = self
            .peer_connection
            .create_offer(None)
            .await
            .context("Failed to create offer")?;
        from_rtc_description(offer)
    }

    async fn create_answer(&self) -> Result<SessionDescription> {
        let answer = self
            .peer_connection
            .create_answer(None)
            .await
            .context("Failed to create answer")?;
        from_rtc_description(answer)
    }

    async fn set_local_description(&self, desc: SessionDescription) -> Result<()> {
        self.peer_connection
            .set_local_description(to_rtc_description(desc)?)
            .await
            .context("Failed to install local description")?;
        Ok(())
    }

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<()> {
        self.peer_connection
            .set_remote_description(to_rtc_description(desc)?)
            .await
            .context("Failed to install remote description")?;
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()> {
        self.peer_connection
            .add_ice_candidate(to_rtc_candidate(candidate))
            .await
            .context("Failed to add ICE candidate")?;
        Ok(())
    }

    fn signaling_state(&self) -> SignalingState {
        match self.peer_connection.signaling_state() {
            RTCSignalingState::Unspecified | RTCSignalingState::Stable => SignalingState::Stable,
            RTCSignalingState::HaveLocalOffer => SignalingState::HaveLocalOffer,
            RTCSignalingState::HaveRemoteOffer => SignalingState::HaveRemoteOffer,
            RTCSignalingState::HaveLocalPranswer => SignalingState::HaveLocalPranswer,
            RTCSignalingState::HaveRemotePranswer => SignalingState::HaveRemotePranswer,
            RTCSignalingState::Closed => SignalingState::Closed,
        }
    }

    async fn has_remote_description(&self) -> bool {
        self.peer_connection.remote_description().await.is_some()
    }

    async fn open_input_channel(&self) -> Result<()> {
        let init = RTCDataChannelInit {
            ordered: Some(true),
            ..Default::default()
        };
        let channel = self
            .peer_connection
            .create_data_channel(INPUT_CHANNEL_LABEL, Some(init))
            .await
            .context("Failed to open input channel")?;

        wire_channel(&channel, self.events.clone());
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.peer_connection
            .close()
            .await
            .context("Failed to close peer connection")?;
        Ok(())
    }
}

/// Route the channel's lifecycle and traffic into the event sink.
fn wire_channel(channel: &Arc<RTCDataChannel>, sink: EventSink) {
    let weak = Arc::downgrade(channel);
    let open_sink = sink.clone();
    channel.on_open(Box::new(move || {
        let sink = open_sink.clone();

        Box::pin(async move {
            let Some(channel) = weak.upgrade() else { return };
            info!("Input channel open with {}", sink.remote());
            sink.emit(TransportEventKind::ChannelOpen(channel));
        })
    }));

    let msg_sink = sink.clone();
    channel.on_message(Box::new(move |msg: DataChannelMessage| {
        let sink = msg_sink.clone();

        Box::pin(async move {
            let bytes = Bytes::from(msg.data.to_vec());
            sink.emit(TransportEventKind::ChannelMessage(bytes));
        })
    }));

    let close_sink = sink.clone();
    channel.on_close(Box::new(move || {
        let sink = close_sink.clone();

        Box::pin(async move {
            debug!("Input channel with {} closed", sink.remote());
            sink.emit(TransportEventKind::ChannelClosed);
        })
    }));

    channel.on_error(Box::new(move |e: webrtc::Error| {
        let sink = sink.clone();

        Box::pin(async move {
            sink.emit(TransportEventKind::ChannelError(e.to_string()));
        })
    }));
}

fn to_rtc_ice_server(server: &IceServerConfig) -> RTCIceServer {
    RTCIceServer {
        urls: server.urls.clone(),
        username: server.username.clone().unwrap_or_default(),
        credential: server.credential.clone().unwrap_or_default(),
    }
}

fn to_transport_state(s: RTCPeerConnectionState) -> Option<TransportState> {
    match s {
        RTCPeerConnectionState::Unspecified => None,
        RTCPeerConnectionState::New => Some(TransportState::New),
        RTCPeerConnectionState::Connecting => Some(TransportState::Connecting),
        RTCPeerConnectionState::Connected => Some(TransportState::Connected),
        RTCPeerConnectionState::Disconnected => Some(TransportState::Disconnected),
        RTCPeerConnectionState::Failed => Some(TransportState::Failed),
        RTCPeerConnectionState::Closed => Some(TransportState::Closed),
    }
}

fn to_rtc_description(desc: SessionDescription) -> Result<RTCSessionDescription> {
    let rtc = match desc.kind {
        SdpKind::Offer => RTCSessionDescription::offer(desc.sdp)?,
        SdpKind::Answer => RTCSessionDescription::answer(desc.sdp)?,
    };
    Ok(rtc)
}

fn from_rtc_description(desc: RTCSessionDescription) -> Result<SessionDescription> {
    match desc.sdp_type {
        RTCSdpType::Offer => Ok(SessionDescription::offer(desc.sdp)),
        RTCSdpType::Answer => Ok(SessionDescription::answer(desc.sdp)),
        other => bail!("Unsupported session description type: {}", other),
    }
}

fn to_rtc_candidate(candidate: IceCandidate) -> RTCIceCandidateInit {
    RTCIceCandidateInit {
        candidate: candidate.candidate,
        sdp_mid: candidate.sdp_mid,
        sdp_mline_index: candidate.sdp_m_line_index,
        username_fragment: candidate.username_fragment,
    }
}

fn from_rtc_candidate(init: RTCIceCandidateInit) -> IceCandidate {
    IceCandidate {
        candidate: init.candidate,
        sdp_mid: init.sdp_mid,
        sdp_m_line_index: init.sdp_mline_index,
        username_fragment: init.username_fragment,
    }
}
