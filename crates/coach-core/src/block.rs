use crate::error::{CoachError, Result};
use crate::types::BlockKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// BlockId
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    /// Random v4 id; ids are never derived from position so a deleted
    /// block's id cannot come back.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for BlockId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ---------------------------------------------------------------------------
// BlockBody
// ---------------------------------------------------------------------------

/// Type-specific part of a block. The variant is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockBody {
    Text,
    Steps {
        #[serde(default)]
        items: Vec<String>,
    },
    Ingredients {
        #[serde(default)]
        items: Vec<String>,
    },
    Image {
        #[serde(default, rename = "imageUrl", skip_serializing_if = "Option::is_none")]
        image_url: Option<String>,
    },
}

impl BlockBody {
    pub fn empty(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Text => BlockBody::Text,
            BlockKind::Steps => BlockBody::Steps { items: Vec::new() },
            BlockKind::Ingredients => BlockBody::Ingredients { items: Vec::new() },
            BlockKind::Image => BlockBody::Image { image_url: None },
        }
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            BlockBody::Text => BlockKind::Text,
            BlockBody::Steps { .. } => BlockKind::Steps,
            BlockBody::Ingredients { .. } => BlockKind::Ingredients,
            BlockBody::Image { .. } => BlockKind::Image,
        }
    }
}

// ---------------------------------------------------------------------------
// ContentBlock
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub id: BlockId,
    pub order: usize,
    #[serde(default)]
    pub content: String,
    #[serde(flatten)]
    pub body: BlockBody,
}

impl ContentBlock {
    pub fn kind(&self) -> BlockKind {
        self.body.kind()
    }

    pub fn items(&self) -> Option<&[String]> {
        match &self.body {
            BlockBody::Steps { items } | BlockBody::Ingredients { items } => Some(items),
            BlockBody::Text | BlockBody::Image { .. } => None,
        }
    }

    pub fn image_url(&self) -> Option<&str> {
        match &self.body {
            BlockBody::Image { image_url } => image_url.as_deref(),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// BlockPatch
// ---------------------------------------------------------------------------

/// Partial update for a block. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<String>>,
    /// An empty string clears the image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl BlockPatch {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn items<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: Some(items.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn image_url(url: impl Into<String>) -> Self {
        Self {
            image_url: Some(url.into()),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// BlockList
// ---------------------------------------------------------------------------

/// Ordered block sequence of one document.
///
/// `order` is always `0..len` in sequence order and ids are unique; every
/// mutation re-sequences before returning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ContentBlock>", into = "Vec<ContentBlock>")]
pub struct BlockList {
    blocks: Vec<ContentBlock>,
}

impl From<Vec<ContentBlock>> for BlockList {
    /// Accepts blocks in any order; sorts by stored `order`, drops repeated
    /// ids (first wins) and re-sequences.
    fn from(mut blocks: Vec<ContentBlock>) -> Self {
        blocks.sort_by_key(|b| b.order);
        let mut seen = std::collections::HashSet::new();
        blocks.retain(|b| seen.insert(b.id.clone()));
        let mut list = Self { blocks };
        list.resequence();
        list
    }
}

impl From<BlockList> for Vec<ContentBlock> {
    fn from(list: BlockList) -> Self {
        list.blocks
    }
}

impl BlockList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn as_slice(&self) -> &[ContentBlock] {
        &self.blocks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ContentBlock> {
        self.blocks.iter()
    }

    pub fn get(&self, id: &BlockId) -> Option<&ContentBlock> {
        self.blocks.iter().find(|b| &b.id == id)
    }

    pub fn contains(&self, id: &BlockId) -> bool {
        self.get(id).is_some()
    }

    pub fn position(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| &b.id == id)
    }

    /// Append an empty block of `kind` and return its id.
    pub fn add(&mut self, kind: BlockKind) -> BlockId {
        let id = BlockId::generate();
        self.blocks.push(ContentBlock {
            id: id.clone(),
            order: self.blocks.len(),
            content: String::new(),
            body: BlockBody::empty(kind),
        });
        id
    }

    /// Remove the block with `id`. Absent ids are a no-op.
    pub fn remove(&mut self, id: &BlockId) -> Option<ContentBlock> {
        let i = self.position(id)?;
        let removed = self.blocks.remove(i);
        self.resequence();
        Some(removed)
    }

    /// Move the block with `id` to `new_index`, clamped to the list bounds.
    /// Returns false when the id is absent.
    pub fn reorder(&mut self, id: &BlockId, new_index: usize) -> bool {
        let Some(from) = self.position(id) else {
            return false;
        };
        let to = new_index.min(self.blocks.len() - 1);
        if from != to {
            let block = self.blocks.remove(from);
            self.blocks.insert(to, block);
            self.resequence();
        }
        true
    }

    /// Merge `patch` into the block with `id`.
    ///
    /// Returns the names of patch fields that do not apply to the block's
    /// type; those are dropped, never stored.
    pub fn update(&mut self, id: &BlockId, patch: &BlockPatch) -> Result<Vec<&'static str>> {
        let block = self
            .blocks
            .iter_mut()
            .find(|b| &b.id == id)
            .ok_or_else(|| CoachError::BlockNotFound(id.to_string()))?;

        if let Some(content) = &patch.content {
            block.content = content.clone();
        }

        let mut ignored = Vec::new();
        match &mut block.body {
            BlockBody::Text => {
                if patch.items.is_some() {
                    ignored.push("items");
                }
                if patch.image_url.is_some() {
                    ignored.push("imageUrl");
                }
            }
            BlockBody::Steps { items } | BlockBody::Ingredients { items } => {
                if let Some(new_items) = &patch.items {
                    *items = new_items.clone();
                }
                if patch.image_url.is_some() {
                    ignored.push("imageUrl");
                }
            }
            BlockBody::Image { image_url } => {
                if let Some(url) = &patch.image_url {
                    let url = url.trim();
                    *image_url = (!url.is_empty()).then(|| url.to_string());
                }
                if patch.items.is_some() {
                    ignored.push("items");
                }
            }
        }

        if !ignored.is_empty() {
            tracing::debug!(block = %id, kind = %block.kind(), ?ignored, "ignored block fields");
        }
        Ok(ignored)
    }

    fn resequence(&mut self) {
        for (i, block) in self.blocks.iter_mut().enumerate() {
            block.order = i;
        }
    }
}

impl<'a> IntoIterator for &'a BlockList {
    type Item = &'a ContentBlock;
    type IntoIter = std::slice::Iter<'a, ContentBlock>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn assert_dense(list: &BlockList) {
        let orders: Vec<usize> = list.iter().map(|b| b.order).collect();
        assert_eq!(orders, (0..list.len()).collect::<Vec<_>>());
        let ids: HashSet<&BlockId> = list.iter().map(|b| &b.id).collect();
        assert_eq!(ids.len(), list.len());
    }

    #[test]
    fn add_appends_with_next_order() {
        let mut list = BlockList::new();
        let a = list.add(BlockKind::Text);
        let b = list.add(BlockKind::Steps);
        assert_eq!(list.get(&a).unwrap().order, 0);
        assert_eq!(list.get(&b).unwrap().order, 1);
        assert_eq!(list.get(&b).unwrap().items(), Some(&[][..]));
    }

    #[test]
    fn remove_resequences_and_ignores_unknown() {
        let mut list = BlockList::new();
        let a = list.add(BlockKind::Text);
        let b = list.add(BlockKind::Text);
        let c = list.add(BlockKind::Text);

        assert!(list.remove(&b).is_some());
        assert_eq!(list.get(&c).unwrap().order, 1);
        assert!(list.remove(&BlockId::from("nope")).is_none());
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(&a).unwrap().order, 0);
        assert_dense(&list);
    }

    #[test]
    fn removed_ids_are_not_reused() {
        let mut list = BlockList::new();
        let a = list.add(BlockKind::Text);
        list.remove(&a);
        let b = list.add(BlockKind::Text);
        assert_ne!(a, b);
    }

    #[test]
    fn reorder_clamps_index() {
        let mut list = BlockList::new();
        let a = list.add(BlockKind::Text);
        let b = list.add(BlockKind::Image);
        let c = list.add(BlockKind::Steps);

        assert!(list.reorder(&a, 99));
        let ids: Vec<&BlockId> = list.iter().map(|x| &x.id).collect();
        assert_eq!(ids, vec![&b, &c, &a]);

        assert!(list.reorder(&a, 0));
        assert_eq!(list.as_slice()[0].id, a);
        assert!(!list.reorder(&BlockId::from("missing"), 0));
        assert_dense(&list);
    }

    #[test]
    fn mixed_operations_keep_orders_dense() {
        let mut list = BlockList::new();
        let mut ids = Vec::new();
        for i in 0..12 {
            let kind = [BlockKind::Text, BlockKind::Steps, BlockKind::Image][i % 3];
            ids.push(list.add(kind));
            if i % 4 == 3 {
                let victim = ids.remove(i % ids.len());
                list.remove(&victim);
            }
            if i % 3 == 2 {
                list.reorder(&ids[0], i);
            }
            assert_dense(&list);
        }
    }

    #[test]
    fn update_drops_fields_foreign_to_type() {
        let mut list = BlockList::new();
        let text = list.add(BlockKind::Text);
        let patch = BlockPatch {
            content: Some("Breathe in".into()),
            items: Some(vec!["x".into()]),
            image_url: Some("http://img".into()),
        };
        let ignored = list.update(&text, &patch).unwrap();
        assert_eq!(ignored, vec!["items", "imageUrl"]);
        let block = list.get(&text).unwrap();
        assert_eq!(block.content, "Breathe in");
        assert_eq!(block.body, BlockBody::Text);
    }

    #[test]
    fn update_image_url_trims_and_clears() {
        let mut list = BlockList::new();
        let img = list.add(BlockKind::Image);
        list.update(&img, &BlockPatch::image_url(" https://cdn/a.png ")).unwrap();
        assert_eq!(list.get(&img).unwrap().image_url(), Some("https://cdn/a.png"));
        list.update(&img, &BlockPatch::image_url("")).unwrap();
        assert_eq!(list.get(&img).unwrap().image_url(), None);
    }

    #[test]
    fn update_missing_block_errors() {
        let mut list = BlockList::new();
        let err = list
            .update(&BlockId::from("ghost"), &BlockPatch::content("x"))
            .unwrap_err();
        assert!(matches!(err, CoachError::BlockNotFound(_)));
    }

    #[test]
    fn json_shape_matches_payload() {
        let mut list = BlockList::new();
        let steps = list.add(BlockKind::Steps);
        list.update(&steps, &BlockPatch::items(["Warm up", "3x10 squats"]))
            .unwrap();
        let img = list.add(BlockKind::Image);
        list.update(&img, &BlockPatch::image_url("https://cdn/x.png")).unwrap();

        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(json[0]["type"], "steps");
        assert_eq!(json[0]["order"], 0);
        assert_eq!(json[0]["items"][1], "3x10 squats");
        assert!(json[0].get("imageUrl").is_none());
        assert_eq!(json[1]["type"], "image");
        assert_eq!(json[1]["imageUrl"], "https://cdn/x.png");
        assert!(json[1].get("items").is_none());

        let back: BlockList = serde_json::from_value(json).unwrap();
        assert_eq!(back, list);
    }

    #[test]
    fn loading_sparse_orders_resequences() {
        let json = serde_json::json!([
            { "id": "b", "type": "text", "order": 7, "content": "second" },
            { "id": "a", "type": "text", "order": 2, "content": "first" },
            { "id": "a", "type": "text", "order": 9, "content": "dup" }
        ]);
        let list: BlockList = serde_json::from_value(json).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.as_slice()[0].content, "first");
        assert_dense(&list);
    }

    // -----------------------------------------------------------------------
    // Random operation sequences
    // -----------------------------------------------------------------------

    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Add(BlockKind),
        Remove(usize),
        Reorder(usize, usize),
    }

    fn arb_kind() -> impl Strategy<Value = BlockKind> {
        prop_oneof![
            Just(BlockKind::Text),
            Just(BlockKind::Steps),
            Just(BlockKind::Ingredients),
            Just(BlockKind::Image),
        ]
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            arb_kind().prop_map(Op::Add),
            (0usize..16).prop_map(Op::Remove),
            (0usize..16, 0usize..20).prop_map(|(i, to)| Op::Reorder(i, to)),
        ]
    }

    proptest! {
        #[test]
        fn prop_orders_stay_dense_and_ids_unique(ops in prop::collection::vec(arb_op(), 1..60)) {
            let mut list = BlockList::new();
            let mut seen: HashSet<BlockId> = HashSet::new();
            for op in ops {
                match op {
                    Op::Add(kind) => {
                        let id = list.add(kind);
                        prop_assert!(seen.insert(id.clone()), "id reused: {}", id);
                        prop_assert_eq!(list.get(&id).map(|b| b.kind()), Some(kind));
                    }
                    Op::Remove(idx) => {
                        let before = list.len();
                        // Indices past the end target an unknown id.
                        let id = list
                            .as_slice()
                            .get(idx)
                            .map(|b| b.id.clone())
                            .unwrap_or_else(|| BlockId::from("unknown"));
                        let removed = list.remove(&id);
                        prop_assert_eq!(removed.is_some(), idx < before);
                        prop_assert_eq!(list.len(), before - usize::from(idx < before));
                        prop_assert!(!list.contains(&id));
                    }
                    Op::Reorder(idx, to) => {
                        let Some(id) = list.as_slice().get(idx).map(|b| b.id.clone()) else {
                            continue;
                        };
                        prop_assert!(list.reorder(&id, to));
                        prop_assert_eq!(list.position(&id), Some(to.min(list.len() - 1)));
                    }
                }
                assert_dense(&list);
            }
        }
    }
}
