//! Query and index reports.

use core::cmp::Ordering;
use core::fmt;

use serde::Serialize;

const RULE: &str = "+------------------------------------------------------------+";

/// One address reached from the queried node.
///
/// Ranks by `degree_out` (greater first), then by lower node id, then by
/// heavier edge weight. The order is total, so ranking never depends on
/// heap layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedNeighbor {
    /// Address text.
    pub ip: String,
    /// Dense node id.
    pub node_id: usize,
    /// The neighbor's own out-degree.
    pub degree_out: usize,
    /// Weight of the edge that reached it.
    pub weight: i64,
}

impl Ord for RankedNeighbor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.degree_out
            .cmp(&other.degree_out)
            .then_with(|| other.node_id.cmp(&self.node_id))
            .then_with(|| self.weight.cmp(&other.weight))
    }
}

impl PartialOrd for RankedNeighbor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Result of [`SummaryEngine::summarize`](super::SummaryEngine::summarize).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryReport {
    /// Canonical text of the queried address.
    pub ip: String,
    /// Its dense node id.
    pub node_id: usize,
    /// How many connections reached it.
    pub degree_in: usize,
    /// How many connections it made.
    pub degree_out: usize,
    /// Collisions observed while the hash index was built.
    pub collisions: usize,
    /// Hash table capacity.
    pub capacity: usize,
    /// Accessed addresses, most heavily accessing first.
    pub accessed: Vec<RankedNeighbor>,
}

impl fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RULE}")?;
        writeln!(f, "| Summary for {}", self.ip)?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "| Addresses accessed:           {}", self.degree_out)?;
        writeln!(f, "| Addresses that accessed it:   {}", self.degree_in)?;
        writeln!(
            f,
            "| Hash collisions:              {} (capacity {})",
            self.collisions, self.capacity
        )?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "| Accessed addresses")?;
        writeln!(f, "{RULE}")?;
        if self.accessed.is_empty() {
            writeln!(f, "| (none)")?;
        }
        for (rank, neighbor) in self.accessed.iter().enumerate() {
            writeln!(
                f,
                "| {:>3}. {:<15}  accessed {}",
                rank + 1,
                neighbor.ip,
                neighbor.degree_out
            )?;
        }
        write!(f, "{RULE}")
    }
}

/// Shape of the hash index after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexStats {
    /// Operator choice, `1..=5`.
    pub choice: u8,
    /// The five prime capacity candidates.
    pub candidates: [usize; crate::primes::CANDIDATE_COUNT],
    /// Selected capacity.
    pub capacity: usize,
    /// Indexed nodes.
    pub elements: usize,
    /// Total probe steps.
    pub collisions: usize,
    /// `elements / capacity`.
    pub load_factor: f64,
}

impl fmt::Display for IndexStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RULE}")?;
        writeln!(
            f,
            "| Hash index of capacity {} (choice {} of {:?})",
            self.capacity, self.choice, self.candidates
        )?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "| Elements:     {}", self.elements)?;
        writeln!(f, "| Collisions:   {}", self.collisions)?;
        writeln!(f, "| Load factor:  {:.3}", self.load_factor)?;
        write!(f, "{RULE}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neighbor(node_id: usize, degree_out: usize, weight: i64) -> RankedNeighbor {
        RankedNeighbor {
            ip: format!("10.0.0.{node_id}"),
            node_id,
            degree_out,
            weight,
        }
    }

    #[test]
    fn test_rank_order() {
        let mut ranked = vec![
            neighbor(3, 1, 0),
            neighbor(1, 4, 0),
            neighbor(2, 1, 0),
            neighbor(2, 1, 9),
        ];
        ranked.sort_by(|a, b| b.cmp(a));
        let ids: Vec<_> = ranked.iter().map(|n| (n.node_id, n.weight)).collect();
        assert_eq!(ids, vec![(1, 0), (2, 9), (2, 0), (3, 0)]);
    }

    #[test]
    fn test_display_lists_ranks() {
        let report = SummaryReport {
            ip: "10.0.0.1".into(),
            node_id: 0,
            degree_in: 0,
            degree_out: 2,
            collisions: 4,
            capacity: 11,
            accessed: vec![neighbor(2, 3, 1), neighbor(3, 0, 1)],
        };
        let text = report.to_string();
        assert!(text.contains("Summary for 10.0.0.1"));
        assert!(text.contains("  1. 10.0.0.2"));
        assert!(text.contains("  2. 10.0.0.3"));
        assert!(text.contains("(capacity 11)"));
    }

    #[test]
    fn test_report_json_shape() {
        let report = SummaryReport {
            ip: "10.0.0.1".into(),
            node_id: 0,
            degree_in: 1,
            degree_out: 1,
            collisions: 0,
            capacity: 3,
            accessed: vec![neighbor(1, 0, 5)],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["degree_out"], 1);
        assert_eq!(json["accessed"][0]["ip"], "10.0.0.1");
        assert_eq!(json["accessed"][0]["weight"], 5);
    }
}
