//! Built-in catalog: 30 concepts over 5 tiers, their dependency edges, and 50 problems.

use perspectra_common::{Concept, ConceptEdge, Problem};

use crate::error::KgError;

pub const TIER_LABELS: [&str; 6] = ["", "Foundations", "Core DS", "Non-Linear DS", "Core Algorithms", "Advanced"];

pub fn tier_label(tier: u8) -> &'static str {
    TIER_LABELS.get(usize::from(tier)).copied().unwrap_or("")
}

// (id, name, tier, difficulty, description)
const CONCEPTS: &[(&str, &str, u8, u8, &str)] = &[
    // Tier 1
    ("c01", "Variables & Data Types", 1, 1, "Basic variable types: int, float, string, bool, and their operations."),
    ("c02", "Arrays", 1, 1, "Static and dynamic arrays, indexing, iteration, and basic operations."),
    ("c03", "Strings", 1, 1, "String manipulation, slicing, common string methods, and patterns."),
    ("c04", "Math & Modular Arithmetic", 1, 2, "GCD, LCM, prime checking, modular operations used in competitive programming."),
    ("c05", "Bit Manipulation", 1, 3, "AND, OR, XOR, shifts, bit tricks like checking power of 2, counting set bits."),
    // Tier 2
    ("c06", "Linked Lists", 2, 2, "Singly and doubly linked lists, traversal, insertion, deletion, reversal."),
    ("c07", "Stacks", 2, 2, "LIFO structure, implementation via array/list, valid parentheses, monotonic stack."),
    ("c08", "Queues", 2, 2, "FIFO structure, deque, circular queue, sliding window maximum."),
    ("c09", "Hash Maps & Sets", 2, 2, "Key-value storage, O(1) lookup, frequency counting, grouping."),
    ("c10", "Recursion", 2, 3, "Base case, recursive case, call stack visualization, classic problems."),
    // Tier 3
    ("c11", "Binary Trees", 3, 3, "Tree terminology, traversals (inorder, preorder, postorder, level-order)."),
    ("c12", "Binary Search Trees", 3, 3, "BST property, insertion, deletion, search, validation, balancing."),
    ("c13", "Heaps & Priority Queues", 3, 3, "Min/max heap, heapify, heap sort, top-K problems."),
    ("c14", "Graphs", 3, 4, "Representation (adjacency list/matrix), directed vs undirected, weighted."),
    ("c15", "Tries", 3, 4, "Prefix tree, insert/search/startsWith, autocomplete, word dictionary."),
    // Tier 4
    ("c16", "Sorting Algorithms", 4, 2, "Bubble, selection, insertion, merge sort, quicksort and their complexity analysis."),
    ("c17", "Binary Search", 4, 2, "Search on sorted arrays, search space reduction, binary search on answer."),
    ("c18", "Two Pointers", 4, 2, "Left-right pointers, fast-slow pointers (Floyd's cycle), pair sum problems."),
    ("c19", "Sliding Window", 4, 3, "Fixed and variable window, maximum subarray variations, frequency maps in window."),
    ("c20", "Prefix Sums", 4, 2, "Cumulative sums, range queries, subarray sum equals K."),
    // Tier 5
    ("c21", "Divide & Conquer", 5, 4, "Divide problem, solve subproblems, merge results: merge sort, closest pairs."),
    ("c22", "Dynamic Programming", 5, 5, "Memoization, tabulation, state definition, classic DP (knapsack, LCS, coins)."),
    ("c23", "Greedy Algorithms", 5, 4, "Local optimal to global optimal. Activity selection, interval scheduling, Huffman."),
    ("c24", "Backtracking", 5, 4, "Explore all possibilities, prune invalid paths. N-queens, subsets, permutations."),
    ("c25", "BFS (Breadth-First Search)", 5, 4, "Level-order traversal, shortest path in unweighted graphs, multi-source BFS."),
    ("c26", "DFS (Depth-First Search)", 5, 4, "Path finding, connected components, cycle detection, topological sort via DFS."),
    ("c27", "Topological Sort", 5, 4, "Ordering of directed acyclic graph (DAG), Kahn's algo, course schedule problems."),
    ("c28", "Union Find", 5, 4, "Disjoint set union, path compression, union by rank, cycle detection in undirected graphs."),
    ("c29", "Shortest Path Algorithms", 5, 5, "Dijkstra, Bellman-Ford, network delay time, cheapest flights within K stops."),
    ("c30", "Segment Trees", 5, 5, "Range queries and point updates in O(log n). Build, query, update operations."),
];

// (dependent, prerequisite)
const DEPENDS_ON: &[(&str, &str)] = &[
    ("c02", "c01"), ("c03", "c01"), ("c04", "c01"), ("c05", "c01"),
    ("c06", "c02"), ("c07", "c02"), ("c08", "c02"), ("c09", "c02"), ("c10", "c02"),
    ("c11", "c10"), ("c11", "c06"), ("c12", "c11"), ("c13", "c11"),
    ("c14", "c09"), ("c14", "c06"), ("c15", "c09"), ("c15", "c10"),
    ("c16", "c02"), ("c17", "c02"), ("c17", "c16"), ("c18", "c02"),
    ("c19", "c02"), ("c19", "c09"), ("c20", "c02"),
    ("c21", "c10"), ("c21", "c16"), ("c22", "c10"), ("c22", "c20"),
    ("c23", "c16"), ("c24", "c10"),
    ("c25", "c14"), ("c25", "c08"),
    ("c26", "c14"), ("c26", "c07"), ("c26", "c10"),
    ("c27", "c26"), ("c27", "c14"), ("c28", "c14"),
    ("c29", "c25"), ("c29", "c13"),
    ("c30", "c02"), ("c30", "c10"),
];

const PROBLEMS_JSON: &str = include_str!("../data/problems.json");

pub fn concepts() -> Vec<Concept> {
    CONCEPTS
        .iter()
        .map(|&(id, name, tier, difficulty, description)| Concept {
            id: id.to_string(),
            name: name.to_string(),
            tier,
            difficulty,
            description: description.to_string(),
            subject: "DSA".to_string(),
        })
        .collect()
}

pub fn edges() -> Vec<ConceptEdge> {
    DEPENDS_ON
        .iter()
        .map(|&(source, target)| ConceptEdge {
            source: source.to_string(),
            target: target.to_string(),
        })
        .collect()
}

pub fn problems() -> Result<Vec<Problem>, KgError> {
    Ok(serde_json::from_str(PROBLEMS_JSON)?)
}
