//! Documented default thresholds for the network builders
//!
//! This module contains all tunable defaults with justification for their
//! values. The config structs in [`crate::config`] start from these;
//! centralizing them prevents magic numbers spread across builders.

// =============================================================================
// HASHTAG NETWORK THRESHOLDS
// Calibrated on a corpus of tens of thousands of posts about a single TV
// show, where a handful of official hashtags dominate.
// =============================================================================

/// Minimum number of posts a hashtag must appear in to become a node
///
/// Hashtags seen once or twice are typos and one-off jokes; requiring 3
/// posts keeps the node set focused on tags with an actual audience.
pub const DEFAULT_MIN_HASHTAG_FREQ: u64 = 3;

/// Minimum co-occurrence count for a hashtag-hashtag edge
///
/// A single co-mention is noise at this corpus size; requiring 2 shared
/// posts removes the long tail of accidental pairings.
pub const DEFAULT_MIN_HASHTAG_EDGE_WEIGHT: u64 = 2;

// =============================================================================
// WORD NETWORK THRESHOLDS
// Word vocabularies are an order of magnitude larger than hashtag
// vocabularies, so every threshold is stricter and a node cap applies.
// =============================================================================

/// Minimum number of posts a word must appear in to become a node
pub const DEFAULT_MIN_WORD_FREQ: u64 = 5;

/// Minimum co-occurrence count for a word-word edge
pub const DEFAULT_MIN_WORD_EDGE_WEIGHT: u64 = 3;

/// Node cap for the word network (top-N by frequency)
///
/// 300 nodes is the practical ceiling for a readable labeled rendering;
/// past that Gephi drawings become hairballs regardless of layout quality.
pub const DEFAULT_MAX_WORD_NODES: usize = 300;

// =============================================================================
// AUTHOR NETWORK THRESHOLDS
// The author network links accounts by the similarity of their hashtag
// vocabularies, not by raw co-occurrence counts.
// =============================================================================

/// Minimum posts for an author to qualify as a node
pub const DEFAULT_MIN_POSTS_PER_AUTHOR: u64 = 3;

/// Minimum distinct hashtags for an author to qualify as a node
///
/// An author using a single hashtag carries no similarity signal; their
/// Jaccard against anyone is either 0 or degenerate.
pub const DEFAULT_MIN_UNIQUE_HASHTAGS: usize = 2;

/// Minimum shared hashtags for an author-author edge
pub const DEFAULT_MIN_SHARED_HASHTAGS: usize = 2;

/// Minimum Jaccard similarity for an author-author edge
///
/// 0.08 cuts pairs that share only the corpus-wide viral tags while their
/// vocabularies otherwise diverge.
pub const DEFAULT_MIN_JACCARD: f64 = 0.08;

// =============================================================================
// BIPARTITE (AUTHOR-HASHTAG) THRESHOLDS
// =============================================================================

/// Minimum hashtag frequency in the bipartite network
pub const DEFAULT_MIN_BIPARTITE_HASHTAG_FREQ: u64 = 3;

/// Minimum posts-by-author-containing-hashtag for a bipartite edge
pub const DEFAULT_MIN_BIPARTITE_EDGE_WEIGHT: u64 = 2;

// =============================================================================
// LAYOUT PARAMETERS
// The primary layout is a ForceAtlas2-style force-directed scheme with
// Barnes-Hut repulsion; the fallback is a seeded Fruchterman-Reingold
// spring layout.
// =============================================================================

/// Iteration count for the primary force-directed layout
///
/// The layout terminates after this many steps regardless of convergence;
/// it is an approximate drawing, not a physical simulation.
pub const DEFAULT_LAYOUT_ITERATIONS: usize = 2000;

/// Repulsion scaling for the primary layout
pub const DEFAULT_SCALING_RATIO: f64 = 12.0;

/// Gravity pulling nodes toward the origin, preventing disconnected
/// components from drifting off-canvas
pub const DEFAULT_GRAVITY: f64 = 1.0;

/// Barnes-Hut opening angle; regions further than size/theta are
/// approximated by their center of mass
pub const DEFAULT_BARNES_HUT_THETA: f64 = 1.2;

/// Exponent applied to edge weight when computing attraction
pub const DEFAULT_EDGE_WEIGHT_INFLUENCE: f64 = 1.0;

/// Fixed RNG seed for the fallback spring layout, making it reproducible
/// across runs
pub const DEFAULT_LAYOUT_SEED: u64 = 7;

/// Iteration count for the fallback spring layout
pub const DEFAULT_SPRING_ITERATIONS: usize = 50;

/// Optimal node distance for the fallback spring layout
pub const DEFAULT_SPRING_OPTIMAL_DISTANCE: f64 = 0.8;

// =============================================================================
// VISUAL ENCODING RANGES
// Consumed by min-max scaling of weighted degree (node size) and edge
// weight (edge width) when preparing a rendering.
// =============================================================================

/// Node size range in rendering units
pub const DEFAULT_NODE_SIZE_MIN: f64 = 200.0;
pub const DEFAULT_NODE_SIZE_MAX: f64 = 4200.0;

/// Edge width range in rendering units
pub const DEFAULT_EDGE_WIDTH_MIN: f64 = 0.5;
pub const DEFAULT_EDGE_WIDTH_MAX: f64 = 6.0;

// =============================================================================
// TEXT CLEANING
// =============================================================================

/// Minimum token length kept by the word tokenizer
///
/// Portuguese function words and chat abbreviations concentrate below 3
/// characters; dropping them is cheaper than enumerating every variant.
pub const DEFAULT_MIN_TOKEN_LEN: usize = 3;

/// The show's own official hashtags, excluded in the "without generics"
/// network variants because they appear in nearly every post and connect
/// everything to everything
pub const GENERIC_HASHTAGS: &[&str] = &["#bbb", "#bbb26"];

/// Generic corpus-wide terms excluded from word network variants
pub const GENERIC_TERMS: &[&str] = &["bbb", "bbb26", "redebbb", "globo", "bigday", "big", "day"];

/// Aggregator accounts that repost trending summaries; their posts are
/// machine-generated and distort co-occurrence counts
pub const AGGREGATOR_HANDLES: &[&str] = &["nowbreezing.ntw.app", "hourlybreezing.ntw.app"];

/// Portuguese stopword list used by the tokenizer, extended with chat
/// abbreviations common in this corpus
pub const STOPWORDS_PT: &[&str] = &[
    "a", "à", "agora", "ai", "aí", "ainda", "além", "algo", "algum", "alguma", "algumas",
    "alguns", "ao", "aos", "apenas", "aqui", "as", "até", "bem", "boa", "boas", "bom", "bons",
    "cada", "cadê", "cê", "cem", "certo", "como", "com", "contra", "da", "das", "de", "dela",
    "dele", "deles", "delas", "demais", "depois", "desde", "dessa", "desse", "deste", "desta",
    "disso", "disto", "do", "dos", "e", "é", "ela", "ele", "eles", "elas", "em", "era", "eram",
    "essa", "esse", "esta", "está", "estão", "estava", "estavam", "este", "estes", "estas",
    "eu", "foi", "foram", "há", "isso", "isto", "já", "lá", "lhe", "lhes", "mais", "mas", "me",
    "mesmo", "meu", "minha", "meus", "minhas", "muita", "muitas", "muito", "muitos", "na",
    "nas", "não", "nem", "nessa", "nesse", "nesta", "neste", "no", "nos", "nós", "nossa",
    "nosso", "nossas", "nossos", "num", "numa", "o", "os", "ou", "para", "pela", "pelas",
    "pelo", "pelos", "per", "por", "pra", "pro", "pros", "pras", "qual", "quando", "que",
    "quem", "se", "sem", "seu", "sua", "seus", "suas", "só", "sobre", "também", "tão", "tem",
    "têm", "tinha", "tinham", "toda", "todas", "todo", "todos", "um", "uma", "umas", "uns",
    "vai", "vão", "vc", "vcs", "você", "vocês", "tô", "tá", "tava", "tavam", "rs", "kkk",
    "kkkk", "kk", "pq", "porque", "porquê", "p", "q",
];
