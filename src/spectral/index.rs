use super::columns::Rgb;

// ---------------------------------------------------------------------------
// ColorIndex – nearest-neighbour lookup over RGB triples
// ---------------------------------------------------------------------------

/// A 3-d tree over RGB colours, stored implicitly in a single `Vec`: the node
/// of every sub-slice is its middle element, with smaller-or-equal values on
/// the splitting axis to the left and greater-or-equal to the right.
///
/// Every node remembers its `slot`, the position of the colour in the slice
/// the index was built from, so a query answers with that position.
#[derive(Debug, Clone)]
pub struct ColorIndex {
    nodes: Vec<Node>,
}

#[derive(Debug, Clone, Copy)]
struct Node {
    color: Rgb,
    slot: usize,
}

#[derive(Debug, Clone, Copy)]
struct Best {
    dist: f64,
    slot: usize,
}

impl ColorIndex {
    /// Index `colors`; slot `i` refers to `colors[i]`.
    pub fn build(colors: &[Rgb]) -> Self {
        let mut nodes: Vec<Node> = colors
            .iter()
            .enumerate()
            .map(|(slot, &color)| Node { color, slot })
            .collect();
        arrange(&mut nodes, 0);
        ColorIndex { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Slot of the colour closest to `query` (Euclidean). Equidistant
    /// candidates resolve to the lowest slot. `None` only for an empty index.
    pub fn nearest(&self, query: Rgb) -> Option<usize> {
        let mut best = None;
        search(&self.nodes, 0, query, &mut best);
        best.map(|b| b.slot)
    }
}

fn arrange(nodes: &mut [Node], depth: usize) {
    if nodes.len() <= 1 {
        return;
    }
    let axis = depth % 3;
    nodes.sort_unstable_by(|a, b| {
        a.color
            .channel(axis)
            .total_cmp(&b.color.channel(axis))
            .then(a.slot.cmp(&b.slot))
    });
    let mid = nodes.len() / 2;
    let (left, rest) = nodes.split_at_mut(mid);
    arrange(left, depth + 1);
    arrange(&mut rest[1..], depth + 1);
}

fn search(nodes: &[Node], depth: usize, query: Rgb, best: &mut Option<Best>) {
    if nodes.is_empty() {
        return;
    }
    let mid = nodes.len() / 2;
    let node = nodes[mid];

    let dist = node.color.distance_squared(query);
    let better = match *best {
        None => true,
        Some(b) => dist < b.dist || (dist == b.dist && node.slot < b.slot),
    };
    if better {
        *best = Some(Best {
            dist,
            slot: node.slot,
        });
    }

    let axis = depth % 3;
    let delta = query.channel(axis) - node.color.channel(axis);
    let (near, far) = if delta < 0.0 {
        (&nodes[..mid], &nodes[mid + 1..])
    } else {
        (&nodes[mid + 1..], &nodes[..mid])
    };

    search(near, depth + 1, query, best);
    // Only strictly farther planes can be skipped, ties must still be visited.
    let prune = matches!(*best, Some(b) if delta * delta > b.dist);
    if !prune {
        search(far, depth + 1, query, best);
    }
}
