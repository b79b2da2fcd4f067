use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use webrtc::data_channel::RTCDataChannel;
use webrtc::data_channel::data_channel_state::RTCDataChannelState;

/// Ordered, reliable logical channel carrying encoded input events.
#[async_trait]
pub trait InputChannel: Send + Sync {
    fn label(&self) -> &str;

    fn is_open(&self) -> bool;

    async fn send(&self, data: Bytes) -> Result<()>;

    async fn close(&self) -> Result<()>;
}

#[async_trait]
impl InputChannel for RTCDataChannel {
    fn label(&self) -> &str {
        RTCDataChannel::label(self)
    }

    fn is_open(&self) -> bool {
        self.ready_state() == RTCDataChannelState::Open
    }

    async fn send(&self, data: Bytes) -> Result<()> {
        RTCDataChannel::send(self, &data).await?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        RTCDataChannel::close(self).await?;
        Ok(())
    }
}

