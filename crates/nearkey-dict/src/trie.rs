// Prefix search over the serialized trie region
//
// Node layout (offsets are relative to the start of the trie region):
//
//   edge*        (VLU character, VLU delta) pairs
//   terminator   VLU '#' (suffix list follows) or '&' (no suffixes)
//   suffixes     only after '#': (freq byte != 0, VLU char* , VLU 0)* then 0
//
// The child of edge i lives at `node + delta_0 + ... + delta_i`. Every
// delta is positive, so children follow their parent and each other. A full
// walk also requires pre-order layout (a node, then each child subtree in
// turn) and stops at the prefix limit depth, which bounds both its stack
// and its running time on a malformed region.

use nearkey_core::candidate::Candidate;
use nearkey_core::character::matches_key;

use crate::vlu::Cursor;
use crate::{DictError, NO_SUFFIXES, SUFFIXES_FOLLOW};

/// Offset of the root node within the trie region.
const ROOT: usize = 0;

/// How a node's edge list ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminator {
    SuffixesFollow,
    NoSuffixes,
}

#[derive(Debug, Clone, Copy)]
struct Edge {
    ch: char,
    child: usize,
}

enum Step {
    Edge(Edge),
    End(Terminator),
}

/// Sequential reader over one node's edge list.
///
/// Owns its cursor, so a recursive descent out of one edge leaves the
/// reader where it was and the remaining siblings can still be scanned.
struct EdgeReader<'a> {
    cursor: Cursor<'a>,
    node: usize,
    child: usize,
}

impl<'a> EdgeReader<'a> {
    fn new(region: &'a [u8], node: usize) -> Result<Self, DictError> {
        Ok(Self {
            cursor: Cursor::new(region, node)?,
            node,
            child: node,
        })
    }

    fn step(&mut self) -> Result<Step, DictError> {
        let offset = self.cursor.position();
        let code = self.cursor.read_vlu()?;
        match code {
            SUFFIXES_FOLLOW => return Ok(Step::End(Terminator::SuffixesFollow)),
            NO_SUFFIXES => return Ok(Step::End(Terminator::NoSuffixes)),
            _ => {}
        }
        let ch = char::from_u32(code).ok_or(DictError::InvalidChar { code, offset })?;
        let delta = self.cursor.read_vlu()? as usize;
        if delta == 0 {
            return Err(DictError::InvalidChildOffset {
                node: self.node,
                child: self.child,
            });
        }
        self.child = self.child.saturating_add(delta);
        if self.child <= self.node {
            return Err(DictError::InvalidChildOffset {
                node: self.node,
                child: self.child,
            });
        }
        Ok(Step::Edge(Edge {
            ch,
            child: self.child,
        }))
    }

    /// Skip the remaining edges. Returns the terminator and a cursor
    /// positioned just after it.
    fn finish(mut self) -> Result<(Terminator, Cursor<'a>), DictError> {
        loop {
            if let Step::End(terminator) = self.step()? {
                return Ok((terminator, self.cursor));
            }
        }
    }
}

/// Read a suffix list, emitting one candidate per entry.
fn read_suffixes(
    cursor: &mut Cursor<'_>,
    path: &str,
    emit: &mut impl FnMut(Candidate),
) -> Result<(), DictError> {
    loop {
        let freq = cursor.read_u8()?;
        if freq == 0 {
            return Ok(());
        }
        let mut word = String::with_capacity(path.len() + 8);
        word.push_str(path);
        loop {
            let offset = cursor.position();
            let code = cursor.read_vlu()?;
            if code == 0 {
                break;
            }
            word.push(char::from_u32(code).ok_or(DictError::InvalidChar { code, offset })?);
        }
        emit(Candidate { word, freq });
    }
}

/// Shape of a trie, gathered by a full walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrieStats {
    pub nodes: usize,
    pub edges: usize,
    pub entries: usize,
    /// Longest root-to-node path, in edges.
    pub max_depth: usize,
}

/// Running totals of a full walk and the offset of the last node visited.
struct WalkState {
    stats: TrieStats,
    previous: Option<usize>,
}

/// Prefix searcher over a serialized trie region.
///
/// Holds nothing but the region slice and its depth limit; all traversal
/// state lives on the stack of each call.
#[derive(Debug, Clone, Copy)]
pub struct TrieSearcher<'a> {
    region: &'a [u8],
    max_depth: usize,
}

impl<'a> TrieSearcher<'a> {
    /// Searcher over `region`, whose nodes lie at most `max_depth` edges
    /// below the root (the dictionary's prefix limit).
    pub fn new(region: &'a [u8], max_depth: usize) -> Self {
        Self { region, max_depth }
    }

    /// Resolve a key code prefix into the words stored at its node.
    ///
    /// Edge characters are folded with [`matches_key`] before comparison, so
    /// `"cafe"` reaches an entry indexed as `"Café"`; the returned words
    /// keep the indexed spelling. An unknown prefix yields an empty vector.
    pub fn lookup_prefix(&self, prefix: &[u8]) -> Result<Vec<Candidate>, DictError> {
        let mut out = Vec::new();
        self.lookup_into(prefix, &mut out)?;
        Ok(out)
    }

    /// Like [`lookup_prefix`](Self::lookup_prefix) but appends to `out`.
    pub fn lookup_into(&self, prefix: &[u8], out: &mut Vec<Candidate>) -> Result<(), DictError> {
        // Nothing is indexed below the depth limit.
        if prefix.len() > self.max_depth {
            return Ok(());
        }
        let mut path = String::new();
        self.descend(ROOT, prefix, &mut path, &mut |c| out.push(c))
    }

    fn descend(
        &self,
        node: usize,
        remaining: &[u8],
        path: &mut String,
        emit: &mut impl FnMut(Candidate),
    ) -> Result<(), DictError> {
        let mut edges = EdgeReader::new(self.region, node)?;

        let Some((&wanted, rest)) = remaining.split_first() else {
            let (terminator, mut cursor) = edges.finish()?;
            if terminator == Terminator::SuffixesFollow {
                read_suffixes(&mut cursor, path, emit)?;
            }
            return Ok(());
        };

        // Several edges may fold onto the same key ('E', 'e', 'é'), so the
        // scan continues after each match.
        while let Step::Edge(edge) = edges.step()? {
            if matches_key(edge.ch, wanted) {
                path.push(edge.ch);
                self.descend(edge.child, rest, path, emit)?;
                path.pop();
            }
        }
        Ok(())
    }

    /// Visit every indexed word in trie order. Returns the trie's shape.
    ///
    /// Touches every byte reachable from the root, so a successful walk
    /// also proves the region is structurally sound.
    pub fn for_each_entry(&self, mut f: impl FnMut(Candidate)) -> Result<TrieStats, DictError> {
        let mut state = WalkState {
            stats: TrieStats::default(),
            previous: None,
        };
        let mut path = String::new();
        self.walk(ROOT, 0, &mut path, &mut state, &mut f)?;
        Ok(state.stats)
    }

    /// Every indexed word in trie order.
    pub fn entries(&self) -> Result<Vec<Candidate>, DictError> {
        let mut out = Vec::new();
        self.for_each_entry(|c| out.push(c))?;
        Ok(out)
    }

    pub fn stats(&self) -> Result<TrieStats, DictError> {
        self.for_each_entry(|_| {})
    }

    fn walk(
        &self,
        node: usize,
        depth: usize,
        path: &mut String,
        state: &mut WalkState,
        emit: &mut impl FnMut(Candidate),
    ) -> Result<(), DictError> {
        if depth > self.max_depth {
            return Err(DictError::TooDeep {
                offset: node,
                limit: self.max_depth,
            });
        }
        if let Some(previous) = state.previous.filter(|&p| node <= p) {
            return Err(DictError::NodeOutOfOrder { node, previous });
        }
        state.previous = Some(node);

        let stats = &mut state.stats;
        stats.nodes += 1;
        stats.max_depth = stats.max_depth.max(depth);

        let mut edges = EdgeReader::new(self.region, node)?;
        let mut children = Vec::new();
        let terminator = loop {
            match edges.step()? {
                Step::Edge(edge) => children.push(edge),
                Step::End(terminator) => break terminator,
            }
        };
        stats.edges += children.len();

        if terminator == Terminator::SuffixesFollow {
            let mut cursor = edges.cursor;
            read_suffixes(&mut cursor, path, &mut |c| {
                stats.entries += 1;
                emit(c);
            })?;
        }

        for edge in children {
            path.push(edge.ch);
            self.walk(edge.child, depth + 1, path, state, emit)?;
            path.pop();
        }
        Ok(())
    }
}
