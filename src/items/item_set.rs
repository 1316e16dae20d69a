use super::catalog::{Item, ItemCategory};

/// Items computed for one player for one round
///
/// Order is armor, knife, primary, secondary, utility, then special items
/// (AWP, defuse kit). The engine pushes in that order; delivery ignores it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemSet {
    items: Vec<Item>,
}

impl ItemSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: Item) {
        self.items.push(item);
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = Item>) {
        self.items.extend(items);
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn contains(&self, item: Item) -> bool {
        self.items.contains(&item)
    }

    pub fn count_category(&self, category: ItemCategory) -> usize {
        self.items.iter().filter(|i| i.category() == category).count()
    }

    pub fn has_defuse_kit(&self) -> bool {
        self.contains(Item::DefuseKit)
    }

    /// Items granted through the regular give-items path (everything but the kit)
    pub fn grantable(&self) -> Vec<Item> {
        self.items
            .iter()
            .copied()
            .filter(|i| *i != Item::DefuseKit)
            .collect()
    }

    pub fn utility(&self) -> Vec<Item> {
        self.items
            .iter()
            .copied()
            .filter(|i| i.category() == ItemCategory::Grenade)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a ItemSet {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
