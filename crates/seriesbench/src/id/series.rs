use core::fmt;
use uuid::{Builder, Uuid};

/// Opaque identifier of one synthetic series.
///
/// Backed by a random (version 4) UUID so that it binds natively to a CQL
/// `uuid` column. Identifiers are `Copy`; every data point carries its own
/// copy of the series it belongs to.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct SeriesId {
    id: Uuid,
}

impl SeriesId {
    /// Builds an identifier from 128 random bits.
    ///
    /// The version and variant bits are overwritten so the result is a valid
    /// random UUID; the remaining 122 bits come from `bits` unchanged.
    pub fn from_random(bits: u128) -> Self {
        Self {
            id: Builder::from_random_bytes(bits.to_be_bytes()).into_uuid(),
        }
    }

    pub const fn from_uuid(id: Uuid) -> Self {
        Self { id }
    }

    pub const fn as_uuid(&self) -> Uuid {
        self.id
    }

    pub const fn to_u128(&self) -> u128 {
        self.id.as_u128()
    }
}

impl From<Uuid> for SeriesId {
    fn from(id: Uuid) -> Self {
        Self::from_uuid(id)
    }
}

impl From<SeriesId> for Uuid {
    fn from(id: SeriesId) -> Self {
        id.id
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.id, f)
    }
}

impl fmt::Debug for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SeriesId").field(&self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_bits_produce_v4_uuid() {
        let id = SeriesId::from_random(u128::MAX);
        assert_eq!(id.as_uuid().get_version_num(), 4);

        let id = SeriesId::from_random(0);
        assert_eq!(id.as_uuid().get_version_num(), 4);
    }

    #[test]
    fn distinct_bits_produce_distinct_ids() {
        let a = SeriesId::from_random(1);
        let b = SeriesId::from_random(2);
        assert_ne!(a, b);
    }

    #[test]
    fn uuid_round_trip_is_lossless() {
        let id = SeriesId::from_random(0xdead_beef_u128 << 64);
        let uuid: Uuid = id.into();
        assert_eq!(SeriesId::from(uuid), id);
        assert_eq!(id.to_string(), uuid.to_string());
    }
}
