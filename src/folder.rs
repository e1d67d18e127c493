/// Aggregate size statistics for one folder.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FolderStats {
    pub messages: u32,
    pub total_size: u64,
    pub max_size: u64,
}

impl FolderStats {
    /// Builds the aggregate from individual message sizes.
    pub fn from_sizes(sizes: &[u32]) -> Self {
        Self {
            messages: sizes.len() as u32,
            total_size: sizes.iter().map(|&size| u64::from(size)).sum(),
            max_size: sizes.iter().map(|&size| u64::from(size)).max().unwrap_or(0),
        }
    }
}

/// Outcome of sizing one folder.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FolderUsage {
    /// The folder was measured and gets a report line.
    Measured(FolderStats),
    /// The folder exists but holds no messages; no report line.
    Empty,
    /// The folder could not be measured and is skipped.
    Unavailable(String),
}

/// Compresses sorted sequence numbers into IMAP sequence sets.
///
/// Consecutive runs collapse into `lo:hi` atoms, and atoms are joined
/// with commas into sets of at most `atoms_per_set` entries, so that a
/// sparse SEARCH result never produces an unbounded FETCH command. The
/// sets cover exactly the given sequence numbers.
pub fn sequence_sets(ids: &[u32], atoms_per_set: usize) -> Vec<String> {
    let mut iter = ids.iter().copied();
    let Some(first) = iter.next() else {
        return Vec::new();
    };

    let mut atoms = Vec::new();
    let (mut lo, mut hi) = (first, first);
    for id in iter {
        if id == hi + 1 {
            hi = id;
        } else {
            atoms.push(atom(lo, hi));
            lo = id;
            hi = id;
        }
    }
    atoms.push(atom(lo, hi));

    atoms
        .chunks(atoms_per_set.max(1))
        .map(|chunk| chunk.join(","))
        .collect()
}

fn atom(lo: u32, hi: u32) -> String {
    if lo == hi {
        lo.to_string()
    } else {
        format!("{lo}:{hi}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_from_sizes() {
        let stats = FolderStats::from_sizes(&[500, 1500, 2500]);
        assert_eq!(stats.messages, 3);
        assert_eq!(stats.total_size, 4500);
        assert_eq!(stats.max_size, 2500);
    }

    #[test]
    fn stats_from_no_sizes() {
        assert_eq!(FolderStats::from_sizes(&[]), FolderStats::default());
    }

    #[test]
    fn empty_search_result_yields_no_sets() {
        assert!(sequence_sets(&[], 200).is_empty());
    }

    #[test]
    fn contiguous_ids_collapse_into_one_range() {
        assert_eq!(sequence_sets(&[1, 2, 3, 4, 5], 200), vec!["1:5"]);
    }

    #[test]
    fn gaps_split_into_separate_atoms() {
        assert_eq!(sequence_sets(&[1, 2, 3, 5, 7, 8], 200), vec!["1:3,5,7:8"]);
    }

    #[test]
    fn single_id_is_a_bare_atom() {
        assert_eq!(sequence_sets(&[42], 200), vec!["42"]);
    }

    #[test]
    fn atoms_are_chunked_per_set() {
        assert_eq!(
            sequence_sets(&[1, 3, 5, 7, 9], 2),
            vec!["1,3", "5,7", "9"]
        );
    }
}
