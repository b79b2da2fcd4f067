use crate::PeerError;
use crate::negotiation::{CandidateBuffer, NegotiationState, RemoteConnection};
use crate::relay::RelayOutput;
use crate::session::PeerEvent;
use crate::transport::{
    EventSink, InputChannel, SignalingState, Transport, TransportConfig, TransportEvent,
    TransportEventKind, TransportFactory, TransportId,
};
use deskshare_core::{
    IceCandidate, InputEvent, ParticipantId, ReceivedInput, RelaySignal, Role, SdpKind,
    SessionDescription, SignalPayload,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

/// Receives every decoded input event together with its sender.
pub type InputCallback = Arc<dyn Fn(ReceivedInput) + Send + Sync>;

/// Offer/answer state machine for all remote participants of one local participant.
///
/// Owns the remote connection records and the candidate buffer. Every
/// transition is driven by either a relay signal or a transport event, and the
/// owner is expected to feed both from a single task.
pub struct Negotiator {
    local_id: ParticipantId,
    role: Role,
    config: TransportConfig,
    factory: Arc<dyn TransportFactory>,
    relay: Arc<dyn RelayOutput>,

    records: HashMap<ParticipantId, RemoteConnection>,
    candidates: CandidateBuffer,

    /// Ordered by connection completion.
    connected: Vec<ParticipantId>,
    connected_tx: watch::Sender<Vec<ParticipantId>>,

    events_tx: mpsc::UnboundedSender<TransportEvent>,
    peer_events: Option<mpsc::UnboundedSender<PeerEvent>>,
    input_callback: Option<InputCallback>,
}

impl Negotiator {
    /// Returns the negotiator and the stream of events its transports will report.
    pub fn new(
        local_id: ParticipantId,
        role: Role,
        config: TransportConfig,
        factory: Arc<dyn TransportFactory>,
        relay: Arc<dyn RelayOutput>,
    ) -> (Self, mpsc::UnboundedReceiver<TransportEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (connected_tx, _) = watch::channel(Vec::new());

        let negotiator = Self {
            local_id,
            role,
            config,
            factory,
            relay,
            records: HashMap::new(),
            candidates: CandidateBuffer::new(),
            connected: Vec::new(),
            connected_tx,
            events_tx,
            peer_events: None,
            input_callback: None,
        };

        (negotiator, events_rx)
    }

    pub fn with_peer_events(mut self, tx: mpsc::UnboundedSender<PeerEvent>) -> Self {
        self.peer_events = Some(tx);
        self
    }

    pub fn local_id(&self) -> ParticipantId {
        self.local_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn set_input_callback(&mut self, callback: InputCallback) {
        self.input_callback = Some(callback);
    }

    pub fn watch_connected(&self) -> watch::Receiver<Vec<ParticipantId>> {
        self.connected_tx.subscribe()
    }

    pub fn connected_participants(&self) -> &[ParticipantId] {
        &self.connected
    }

    pub fn record(&self, remote: &ParticipantId) -> Option<&RemoteConnection> {
        self.records.get(remote)
    }

    pub fn state_of(&self, remote: &ParticipantId) -> Option<NegotiationState> {
        self.records.get(remote).map(RemoteConnection::state)
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn pending_candidates(&self, remote: &ParticipantId) -> usize {
        self.candidates.len_for(remote)
    }

    pub async fn handle_signal(&mut self, signal: RelaySignal) {
        match signal {
            RelaySignal::ParticipantJoined { participant_id } => {
                if self.role.is_host() {
                    self.call_logged(participant_id).await;
                } else {
                    debug!("{} joined; waiting for the host to call", participant_id);
                }
            }
            RelaySignal::ConnectionRequested { from } => {
                if self.role.is_host() {
                    self.call_logged(from).await;
                } else {
                    debug!("Ignoring connection request from {}: not the host", from);
                }
            }
            RelaySignal::Offer { from, payload } => self.handle_offer(from, payload).await,
            RelaySignal::Answer { from, payload } => self.handle_answer(from, payload).await,
            RelaySignal::IceCandidate { from, payload } => {
                self.handle_remote_candidate(from, payload).await
            }
            RelaySignal::Error { message } => warn!("Relay reported an error: {}", message),
            other => debug!("Negotiator ignoring {:?}", other),
        }
    }

    /// Start negotiating with `remote`. Idempotent: an existing record is
    /// returned as is and no second offer is sent.
    pub async fn start_call(&mut self, remote: ParticipantId) -> Result<TransportId, PeerError> {
        if let Some(record) = self.records.get(&remote) {
            debug!(
                "Call to {} already in progress ({}); reusing record",
                remote,
                record.state()
            );
            return Ok(record.transport_id());
        }

        let (transport_id, transport) = self.create_record(remote).await?;
        if let Some(record) = self.records.get_mut(&remote) {
            record.mark_initiator();
            record.transition(NegotiationState::Offering);
        }

        info!("Calling {}", remote);
        if let Err(e) = self.offer(remote, &transport).await {
            // Leave nothing behind, so a later notification can call again.
            self.teardown(&remote, NegotiationState::Failed).await;
            return Err(e);
        }

        Ok(transport_id)
    }

    async fn call_logged(&mut self, remote: ParticipantId) {
        if let Err(e) = self.start_call(remote).await {
            error!("Failed to call {}: {}", remote, e);
        }
    }

    async fn offer(
        &self,
        remote: ParticipantId,
        transport: &Arc<dyn Transport>,
    ) -> Result<(), PeerError> {
        if self.role.is_host() {
            transport.open_input_channel().await?;
        }
        let offer = transport.create_offer().await?;
        transport.set_local_description(offer.clone()).await?;

        self.relay.send_offer(remote, offer.to_payload()?).await;
        Ok(())
    }

    async fn handle_offer(&mut self, from: ParticipantId, payload: SignalPayload) {
        let Some(offer) = parse_description(from, payload, SdpKind::Offer) else {
            return;
        };

        let glare = self
            .records
            .get(&from)
            .is_some_and(|r| r.state() == NegotiationState::Offering);
        if glare {
            if self.role.is_host() {
                warn!("Glare with {}: keeping our offer, dropping theirs", from);
                return;
            }
            info!("Glare with {}: withdrawing our offer", from);
            if let Some(record) = self.records.remove(&from) {
                close_record(record, NegotiationState::Closed).await;
            }
        }

        let transport = match self.records.get(&from) {
            Some(record) => Arc::clone(record.transport()),
            None => match self.create_record(from).await {
                Ok((_, transport)) => transport,
                Err(e) => {
                    error!("Failed to create transport for {}: {}", from, e);
                    return;
                }
            },
        };

        let signaling = transport.signaling_state();
        if signaling != SignalingState::Stable {
            warn!(
                "Dropping offer from {}: signaling state is {:?}",
                from, signaling
            );
            return;
        }

        let Some(record) = self.records.get_mut(&from) else {
            return;
        };
        if !record.transition(NegotiationState::Answering) {
            return;
        }

        if let Err(e) = self.answer(from, &transport, offer).await {
            error!("Failed to answer {}: {}", from, e);
            return;
        }

        self.drain_candidates(from, &transport).await;
        self.mark_connected(from);
    }

    async fn answer(
        &self,
        remote: ParticipantId,
        transport: &Arc<dyn Transport>,
        offer: SessionDescription,
    ) -> Result<(), PeerError> {
        transport.set_remote_description(offer).await?;
        let answer = transport.create_answer().await?;
        transport.set_local_description(answer.clone()).await?;

        self.relay.send_answer(remote, answer.to_payload()?).await;
        Ok(())
    }

    async fn handle_answer(&mut self, from: ParticipantId, payload: SignalPayload) {
        let Some(answer) = parse_description(from, payload, SdpKind::Answer) else {
            return;
        };

        let Some(record) = self.records.get(&from) else {
            warn!("Dropping answer from {}: no connection record", from);
            return;
        };
        let transport = Arc::clone(record.transport());

        let signaling = transport.signaling_state();
        if signaling != SignalingState::HaveLocalOffer {
            warn!(
                "Dropping answer from {}: signaling state is {:?}",
                from, signaling
            );
            return;
        }

        if let Err(e) = transport.set_remote_description(answer).await {
            error!("Failed to install answer from {}: {:#}", from, e);
            return;
        }

        self.drain_candidates(from, &transport).await;
        self.mark_connected(from);
    }

    async fn handle_remote_candidate(&mut self, from: ParticipantId, payload: SignalPayload) {
        let candidate = match IceCandidate::from_payload(payload) {
            Ok(candidate) => candidate,
            Err(e) => {
                warn!("Dropping malformed candidate from {}: {}", from, e);
                return;
            }
        };

        let transport = match self.records.get(&from) {
            Some(record) => Arc::clone(record.transport()),
            None => {
                debug!("Buffering candidate from {}: no record yet", from);
                self.candidates.push(from, candidate);
                return;
            }
        };

        if !transport.has_remote_description().await {
            debug!("Buffering candidate from {}: no remote description", from);
            self.candidates.push(from, candidate);
            return;
        }

        if let Err(e) = transport.add_ice_candidate(candidate).await {
            warn!("Failed to apply candidate from {}: {:#}", from, e);
        }
    }

    /// Apply every buffered candidate for `remote`. The buffer is emptied even
    /// when individual candidates fail.
    async fn drain_candidates(&mut self, remote: ParticipantId, transport: &Arc<dyn Transport>) {
        let pending = self.candidates.take(&remote);
        if pending.is_empty() {
            return;
        }

        debug!("Applying {} buffered candidates from {}", pending.len(), remote);
        for candidate in pending {
            if let Err(e) = transport.add_ice_candidate(candidate).await {
                warn!("Failed to apply buffered candidate from {}: {:#}", remote, e);
            }
        }
    }

    fn mark_connected(&mut self, remote: ParticipantId) {
        let Some(record) = self.records.get_mut(&remote) else {
            return;
        };
        if !record.transition(NegotiationState::Connected) {
            return;
        }
        if self.connected.contains(&remote) {
            return;
        }

        info!("Negotiation with {} complete", remote);
        self.connected.push(remote);
        self.publish_connected();
        self.emit(PeerEvent::ParticipantConnected(remote));
    }

    pub async fn handle_transport_event(&mut self, event: TransportEvent) {
        let TransportEvent {
            remote,
            transport,
            kind,
        } = event;

        let Some(record) = self.records.get_mut(&remote) else {
            debug!("Ignoring {:?} for {}: no record", kind, remote);
            return;
        };
        if record.transport_id() != transport {
            debug!("Ignoring {:?} from stale {} for {}", kind, transport, remote);
            return;
        }

        match kind {
            TransportEventKind::StateChanged(state) => {
                record.set_transport_state(state);
                if state.is_lost() {
                    info!("Transport to {} is {:?}; tearing down", remote, state);
                    self.teardown(&remote, NegotiationState::Failed).await;
                }
            }
            TransportEventKind::CandidateGathered(candidate) => match candidate.to_payload() {
                Ok(payload) => self.relay.send_ice(remote, payload).await,
                Err(e) => warn!("Failed to encode local candidate: {}", e),
            },
            TransportEventKind::ChannelOpen(channel) => {
                info!("Input channel '{}' open with {}", channel.label(), remote);
                record.set_channel(channel);
            }
            TransportEventKind::ChannelMessage(data) => self.deliver_input(remote, &data),
            TransportEventKind::ChannelClosed => {
                if record.take_channel().is_some() {
                    debug!("Input channel with {} closed", remote);
                }
            }
            TransportEventKind::ChannelError(e) => {
                warn!("Input channel error with {}: {}", remote, e)
            }
            TransportEventKind::RemoteTrack(track) => self.emit(PeerEvent::RemoteTrack {
                participant: remote,
                track,
            }),
        }
    }

    fn deliver_input(&self, sender: ParticipantId, data: &[u8]) {
        let event = match InputEvent::decode(data) {
            Ok(event) => event,
            Err(e) => {
                warn!("Dropping input packet from {}: {}", sender, e);
                return;
            }
        };

        match &self.input_callback {
            Some(callback) => {
                debug!("Input {} from {}", event.name(), sender);
                callback(ReceivedInput {
                    sender_id: sender,
                    event,
                });
            }
            None => debug!("No input callback; dropping {} from {}", event.name(), sender),
        }
    }

    /// Send `event` to `target`, or to every open input channel when no target
    /// is given. Closed channels are skipped silently. Returns how many
    /// channels accepted the packet.
    pub async fn send_input_event(
        &self,
        event: &InputEvent,
        target: Option<ParticipantId>,
    ) -> Result<usize, PeerError> {
        let data = event.encode()?;

        let channels: Vec<(ParticipantId, Arc<dyn InputChannel>)> = match target {
            Some(remote) => self
                .records
                .get(&remote)
                .and_then(|r| r.channel().map(|ch| (remote, Arc::clone(ch))))
                .into_iter()
                .collect(),
            None => self
                .records
                .values()
                .filter_map(|r| r.channel().map(|ch| (r.remote(), Arc::clone(ch))))
                .collect(),
        };

        let mut delivered = 0;
        for (remote, channel) in channels {
            if !channel.is_open() {
                debug!("Skipping {}: input channel not open", remote);
                continue;
            }
            match channel.send(data.clone()).await {
                Ok(()) => delivered += 1,
                Err(e) => debug!("Input send to {} failed: {:#}", remote, e),
            }
        }

        Ok(delivered)
    }

    /// Close every record. Used when the local session ends.
    pub async fn shutdown(&mut self) {
        let remotes: Vec<ParticipantId> = self.records.keys().copied().collect();
        for remote in remotes {
            self.teardown(&remote, NegotiationState::Closed).await;
        }
        self.candidates = CandidateBuffer::new();

        info!("Negotiator for {} shut down", self.local_id);
    }

    async fn create_record(
        &mut self,
        remote: ParticipantId,
    ) -> Result<(TransportId, Arc<dyn Transport>), PeerError> {
        let transport_id = TransportId::next();
        let sink = EventSink::new(remote, transport_id, self.events_tx.clone());
        let transport = self.factory.create(&self.config, sink).await?;

        debug!("Created {} for {}", transport_id, remote);
        self.records.insert(
            remote,
            RemoteConnection::new(remote, Arc::clone(&transport), transport_id),
        );

        Ok((transport_id, transport))
    }

    /// Remove the record, its channel and its candidate buffer, and drop
    /// `remote` from the connected view.
    async fn teardown(&mut self, remote: &ParticipantId, final_state: NegotiationState) {
        self.candidates.clear(remote);

        if let Some(record) = self.records.remove(remote) {
            close_record(record, final_state).await;
        }

        if let Some(pos) = self.connected.iter().position(|p| p == remote) {
            self.connected.remove(pos);
            self.publish_connected();
            self.emit(PeerEvent::ParticipantDisconnected(*remote));
        }

        info!("Connection to {} removed", remote);
    }

    fn publish_connected(&self) {
        self.connected_tx.send_replace(self.connected.clone());
    }

    fn emit(&self, event: PeerEvent) {
        if let Some(tx) = &self.peer_events {
            let _ = tx.send(event);
        }
    }
}

async fn close_record(mut record: RemoteConnection, final_state: NegotiationState) {
    record.transition(final_state);

    if let Some(channel) = record.take_channel()
        && let Err(e) = channel.close().await
    {
        debug!("Failed to close input channel to {}: {:#}", record.remote(), e);
    }
    if let Err(e) = record.transport().close().await {
        warn!("Failed to close transport to {}: {:#}", record.remote(), e);
    }
}

fn parse_description(
    from: ParticipantId,
    payload: SignalPayload,
    expected: SdpKind,
) -> Option<SessionDescription> {
    match SessionDescription::from_payload(payload) {
        Ok(desc) if desc.kind == expected => Some(desc),
        Ok(desc) => {
            warn!(
                "Dropping description from {}: expected {:?}, got {:?}",
                from, expected, desc.kind
            );
            None
        }
        Err(e) => {
            warn!("Dropping malformed description from {}: {}", from, e);
            None
        }
    }
}
