//! Consumer-group protocol payloads embedded as opaque bytes inside
//! JoinGroup/SyncGroup (§4.B): the group coordinator never looks inside
//! these, but the assignor on either end needs a shared shape for them.

use crate::buffer::{BufferError, ReadBuffer, WireBuffer};

/// One topic's owned partitions, as reported by a member's subscription metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedPartition {
    pub topic: String,
    pub partitions: Vec<i32>,
}

impl OwnedPartition {
    fn encode(&self, buf: &mut WireBuffer) -> Result<(), BufferError> {
        buf.write_str(Some(&self.topic))?;
        let token = buf.write_array_count()?;
        for p in &self.partitions {
            buf.write_i32(*p)?;
        }
        buf.patch_count(token, self.partitions.len() as i32);
        Ok(())
    }

    fn decode(buf: &mut ReadBuffer<'_>) -> Result<Self, BufferError> {
        let topic = buf.read_str()?;
        let n = buf.read_array_count()?;
        let mut partitions = Vec::with_capacity(n.min(4096));
        for _ in 0..n {
            partitions.push(buf.read_i32()?);
        }
        Ok(Self { topic, partitions })
    }
}

/// Subscription metadata a member contributes to JoinGroup (§4.B).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumerGroupMemberMetadata {
    pub version: i16,
    pub topics: Vec<String>,
    pub user_data: Option<Vec<u8>>,
    pub owned_partitions: Vec<OwnedPartition>,
    pub generation_id: i32,
    pub rack_id: Option<String>,
}

impl ConsumerGroupMemberMetadata {
    pub fn encode(&self, buf: &mut WireBuffer) -> Result<(), BufferError> {
        buf.write_i16(self.version)?;
        let token = buf.write_array_count()?;
        for t in &self.topics {
            buf.write_str(Some(t))?;
        }
        buf.patch_count(token, self.topics.len() as i32);
        buf.write_bytes(self.user_data.as_deref())?;
        if self.version >= 1 {
            let token = buf.write_array_count()?;
            for owned in &self.owned_partitions {
                owned.encode(buf)?;
            }
            buf.patch_count(token, self.owned_partitions.len() as i32);
        }
        if self.version >= 2 {
            buf.write_i32(self.generation_id)?;
        }
        if self.version >= 3 {
            buf.write_str(self.rack_id.as_deref())?;
        }
        Ok(())
    }

    pub fn decode(buf: &mut ReadBuffer<'_>) -> Result<Self, BufferError> {
        let version = buf.read_i16()?;
        let n = buf.read_array_count()?;
        let mut topics = Vec::with_capacity(n.min(4096));
        for _ in 0..n {
            topics.push(buf.read_str()?);
        }
        let user_data = buf.read_nullable_bytes()?;
        let owned_partitions = if version >= 1 {
            let n = buf.read_array_count()?;
            let mut out = Vec::with_capacity(n.min(4096));
            for _ in 0..n {
                out.push(OwnedPartition::decode(buf)?);
            }
            out
        } else {
            Vec::new()
        };
        let generation_id = if version >= 2 { buf.read_i32()? } else { -1 };
        let rack_id = if version >= 3 { buf.read_nullable_str()? } else { None };
        Ok(Self {
            version,
            topics,
            user_data,
            owned_partitions,
            generation_id,
            rack_id,
        })
    }
}

/// One topic's assigned partitions, as handed back by SyncGroup (§4.B MemberState).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionAssignment {
    pub topic: String,
    pub partitions: Vec<i32>,
}

/// The full assignment a leader computes for one member and the coordinator
/// relays back verbatim; this is the payload spliced into SyncGroup's
/// per-member MemberState buffer (§4.B).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumerGroupMemberAssignment {
    pub version: i16,
    pub topics: Vec<PartitionAssignment>,
    pub user_data: Option<Vec<u8>>,
}

impl ConsumerGroupMemberAssignment {
    pub fn encode(&self, buf: &mut WireBuffer) -> Result<(), BufferError> {
        buf.write_i16(self.version)?;
        let token = buf.write_array_count()?;
        for t in &self.topics {
            buf.write_str(Some(&t.topic))?;
            let inner = buf.write_array_count()?;
            for p in &t.partitions {
                buf.write_i32(*p)?;
            }
            buf.patch_count(inner, t.partitions.len() as i32);
        }
        buf.patch_count(token, self.topics.len() as i32);
        buf.write_bytes(self.user_data.as_deref())?;
        Ok(())
    }

    pub fn decode(buf: &mut ReadBuffer<'_>) -> Result<Self, BufferError> {
        let version = buf.read_i16()?;
        let n = buf.read_array_count()?;
        let mut topics = Vec::with_capacity(n.min(4096));
        for _ in 0..n {
            let topic = buf.read_str()?;
            let pn = buf.read_array_count()?;
            let mut partitions = Vec::with_capacity(pn.min(4096));
            for _ in 0..pn {
                partitions.push(buf.read_i32()?);
            }
            topics.push(PartitionAssignment { topic, partitions });
        }
        let user_data = buf.read_nullable_bytes()?;
        Ok(Self {
            version,
            topics,
            user_data,
        })
    }
}
