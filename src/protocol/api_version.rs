//! Per-API wire version and the ranges requests/brokers advertise for them.

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct ApiVersion(pub i16);

impl ApiVersion {
    /// Sentinel returned by [`ApiVersionRange::intersect`] when the client and
    /// broker ranges share no version.
    pub const UNSUPPORTED: ApiVersion = ApiVersion(-1);

    pub fn is_unsupported(self) -> bool {
        self.0 < 0
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ApiVersionRange {
    min: ApiVersion,
    max: ApiVersion,
}

impl std::fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ApiVersionRange {
    pub const fn new(min: i16, max: i16) -> Self {
        assert!(min <= max);

        Self {
            min: ApiVersion(min),
            max: ApiVersion(max),
        }
    }

    pub fn min(&self) -> ApiVersion {
        self.min
    }

    pub fn max(&self) -> ApiVersion {
        self.max
    }

    /// Highest version present in both ranges, or `None` if they don't overlap.
    ///
    /// Used by [`crate::negotiator::ApiVersionNegotiator`] (§4.H): the client's
    /// preferred range intersected with the broker-advertised range.
    pub fn intersect(&self, other: &ApiVersionRange) -> Option<ApiVersion> {
        let lo = self.min.0.max(other.min.0);
        let hi = self.max.0.min(other.max.0);
        (lo <= hi).then_some(ApiVersion(hi))
    }
}

impl std::fmt::Display for ApiVersionRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersect_overlapping() {
        let client = ApiVersionRange::new(0, 2);
        let broker = ApiVersionRange::new(1, 5);
        assert_eq!(client.intersect(&broker), Some(ApiVersion(2)));
    }

    #[test]
    fn intersect_disjoint() {
        let client = ApiVersionRange::new(0, 1);
        let broker = ApiVersionRange::new(2, 5);
        assert_eq!(client.intersect(&broker), None);
    }
}
