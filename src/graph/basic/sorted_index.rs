//! Sorted secondary index from IPv4 value to graph node.
//!
//! Entries are appended in node-id order while the node section of a log
//! is read, then sorted once by numeric value. After sealing, the index is
//! the authoritative text → node id resolver for both the build pass and
//! queries, and it owns the degree counters.

use crate::graph::basic::adjacency_graph::GraphError;
use crate::net::IpKey;

/// `IpKey` entries kept ascending by numeric value.
#[derive(Debug, Clone, Default)]
pub struct SortedIpIndex {
    entries: Vec<IpKey>,
    sealed: bool,
}

impl SortedIpIndex {
    pub(crate) fn push(&mut self, key: IpKey) {
        debug_assert!(!self.sealed, "push after seal");
        self.entries.push(key);
    }

    /// Sorts the entries and rejects duplicate addresses.
    ///
    /// # Errors
    /// [`GraphError::DuplicateNode`] naming the two node ids that share
    /// an address.
    pub(crate) fn seal(&mut self) -> Result<(), GraphError> {
        self.entries.sort_unstable();
        if let Some(pair) = self.entries.windows(2).find(|w| w[0] == w[1]) {
            let (a, b) = (pair[0].node_id(), pair[1].node_id());
            return Err(GraphError::DuplicateNode {
                ip: pair[0].text().to_owned(),
                first: a.min(b),
                second: a.max(b),
            });
        }
        self.sealed = true;
        Ok(())
    }

    /// Returns `true` once the index has been sorted.
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Number of indexed nodes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no node is indexed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of `value` in the sorted array, by binary search.
    ///
    /// \(O(\log n)\). Returns `None` if the address was never indexed.
    pub fn binary_search(&self, value: u32) -> Option<usize> {
        let mut low = 0usize;
        let mut high = self.entries.len();
        // Invariant: the match, if any, lies in `low..high`.
        while low < high {
            let mid = low + (high - low) / 2;
            let probe = self.entries[mid].value();
            if probe == value {
                return Some(mid);
            } else if value < probe {
                high = mid;
            } else {
                low = mid + 1;
            }
        }
        None
    }

    /// Entry holding `value`.
    pub fn lookup(&self, value: u32) -> Option<&IpKey> {
        self.binary_search(value).map(|pos| &self.entries[pos])
    }

    /// Entry at a sorted position.
    pub fn get(&self, position: usize) -> Option<&IpKey> {
        self.entries.get(position)
    }

    /// Entry at a position returned by [`Self::binary_search`].
    pub(crate) fn entry_mut(&mut self, position: usize) -> &mut IpKey {
        &mut self.entries[position]
    }

    /// Entries in ascending address order.
    pub fn iter(&self) -> core::slice::Iter<'_, IpKey> {
        self.entries.iter()
    }

    /// Entries as a sorted slice.
    pub fn as_slice(&self) -> &[IpKey] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(ips: &[&str]) -> SortedIpIndex {
        let mut index = SortedIpIndex::default();
        for (id, ip) in ips.iter().enumerate() {
            index.push(IpKey::new(ip, id).unwrap());
        }
        index
    }

    fn value(ip: &str) -> u32 {
        crate::net::parse_ipv4_value(ip).unwrap()
    }

    #[test]
    fn test_seal_sorts_by_value() {
        let mut index = index_of(&["10.0.0.2", "9.9.9.9", "192.168.0.1", "10.0.0.1"]);
        index.seal().unwrap();
        assert!(index.is_sealed());
        let texts: Vec<_> = index.iter().map(IpKey::text).collect();
        assert_eq!(texts, ["9.9.9.9", "10.0.0.1", "10.0.0.2", "192.168.0.1"]);
    }

    #[test]
    fn test_binary_search_every_entry() {
        let ips = ["10.0.0.2", "9.9.9.9", "192.168.0.1", "10.0.0.1", "0.0.0.0", "255.255.255.255"];
        let mut index = index_of(&ips);
        index.seal().unwrap();
        for (id, ip) in ips.iter().enumerate() {
            let pos = index.binary_search(value(ip)).unwrap();
            assert_eq!(index.get(pos).unwrap().node_id(), id);
            assert_eq!(index.lookup(value(ip)).unwrap().text(), *ip);
        }
        assert_eq!(index.binary_search(value("10.0.0.3")), None);
        assert_eq!(index.binary_search(value("1.1.1.1")), None);
    }

    #[test]
    fn test_empty_and_single() {
        let mut empty = SortedIpIndex::default();
        empty.seal().unwrap();
        assert_eq!(empty.binary_search(0), None);

        let mut single = index_of(&["8.8.8.8"]);
        single.seal().unwrap();
        assert_eq!(single.binary_search(value("8.8.8.8")), Some(0));
        assert_eq!(single.binary_search(value("8.8.8.7")), None);
        assert_eq!(single.binary_search(value("8.8.8.9")), None);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut index = index_of(&["1.1.1.1", "2.2.2.2", "001.1.1.1"]);
        let err = index.seal().unwrap_err();
        match err {
            GraphError::DuplicateNode { ip, first, second } => {
                assert_eq!(ip, "1.1.1.1");
                assert_eq!((first, second), (0, 2));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!index.is_sealed());
    }
}
