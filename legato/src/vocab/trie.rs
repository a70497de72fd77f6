use hashbrown::HashMap;

/// A character trie over vocabulary pieces, laid out as an arena of nodes
/// indexed by `u32` handles.
///
/// The trie is mutated only while the vocabulary is loaded; every later
/// operation is a read-only traversal, so a constructed trie can be shared
/// among threads without synchronization.
#[derive(Debug)]
pub struct Trie {
    nodes: Vec<TrieNode>,
}

#[derive(Debug, Default)]
struct TrieNode {
    children: HashMap<char, u32>,
    /// The piece id recorded at this node, when the path from the root
    /// spells a complete piece.
    piece_id: Option<u32>,
}

impl Trie {
    /// Creates a trie holding only the root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
        }
    }

    /// Adds one path from the root for `piece`, creating intermediate nodes
    /// as needed, and records `piece_id` at the terminal node.
    ///
    /// Re-inserting an existing piece overwrites the recorded id (last write
    /// wins). A zero-length piece records nothing: it could never be matched.
    pub fn insert(&mut self, piece: &str, piece_id: u32) {
        if piece.is_empty() {
            return;
        }
        let mut node = 0;
        for c in piece.chars() {
            node = match self.nodes[node as usize].children.get(&c) {
                Some(&child) => child,
                None => {
                    let child = self.nodes.len() as u32;
                    self.nodes.push(TrieNode::default());
                    self.nodes[node as usize].children.insert(c, child);
                    child
                }
            };
        }
        self.nodes[node as usize].piece_id = Some(piece_id);
    }

    /// Returns the number of nodes in the arena, including the root.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns an iterator over every piece that is a prefix of `input`,
    /// ordered by increasing length.
    ///
    /// The walk follows children one character at a time from the start of
    /// `input` and stops at the first character with no matching child.
    #[inline(always)]
    pub fn common_prefix_iterator<'a>(&'a self, input: &'a [char]) -> CommonPrefixIter<'a> {
        CommonPrefixIter {
            trie: self,
            input,
            node: 0,
            pos: 0,
            dead: false,
        }
    }
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

/// A piece found by [`Trie::common_prefix_iterator`].
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct TrieMatch {
    /// Id of the matched piece.
    pub value: u32,
    /// Exclusive end position of the match in characters.
    pub end_char: usize,
}

impl TrieMatch {
    #[inline(always)]
    pub const fn new(value: u32, end_char: usize) -> Self {
        Self { value, end_char }
    }
}

/// Lazy traversal state for a common prefix search.
pub struct CommonPrefixIter<'a> {
    trie: &'a Trie,
    input: &'a [char],
    node: u32,
    pos: usize,
    dead: bool,
}

impl Iterator for CommonPrefixIter<'_> {
    type Item = TrieMatch;

    fn next(&mut self) -> Option<Self::Item> {
        if self.dead {
            return None;
        }
        while self.pos < self.input.len() {
            let c = self.input[self.pos];
            let Some(&child) = self.trie.nodes[self.node as usize].children.get(&c) else {
                self.dead = true;
                return None;
            };
            self.node = child;
            self.pos += 1;
            if let Some(piece_id) = self.trie.nodes[child as usize].piece_id {
                return Some(TrieMatch::new(piece_id, self.pos));
            }
        }
        None
    }
}
