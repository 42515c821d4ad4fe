use std::collections::HashSet;

use floorplan_core::document::ElementId;

/// 当前选中的元素集合（无序）。
///
/// 允许包含文档中不存在的 ID；变更入口会按需与文档取交集。
/// 选中集的变化本身从不产生历史记录。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: HashSet<ElementId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: &ElementId) -> bool {
        self.ids.contains(id)
    }

    /// 加入选中集，返回此前是否未被选中。
    pub fn select(&mut self, id: ElementId) -> bool {
        self.ids.insert(id)
    }

    /// 单选：清空后只保留 `id`。
    pub fn select_only(&mut self, id: ElementId) {
        self.ids.clear();
        self.ids.insert(id);
    }

    pub fn replace<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = ElementId>,
    {
        self.ids.clear();
        self.ids.extend(ids);
    }

    /// 取消选中，返回之前是否处于选中状态。
    pub fn deselect(&mut self, id: &ElementId) -> bool {
        self.ids.remove(id)
    }

    /// 切换选中状态，返回切换后的状态。
    pub fn toggle(&mut self, id: ElementId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&ElementId) -> bool,
    {
        self.ids.retain(|id| keep(id));
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &ElementId> {
        self.ids.iter()
    }

    /// 按字典序返回选中 ID，便于稳定输出。
    pub fn sorted(&self) -> Vec<ElementId> {
        let mut ids: Vec<ElementId> = self.ids.iter().cloned().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> ElementId {
        ElementId::new(raw)
    }

    #[test]
    fn select_toggle_and_deselect() {
        let mut selection = Selection::new();
        assert!(selection.select(id("wall_1")));
        assert!(!selection.select(id("wall_1")));
        assert_eq!(selection.len(), 1);

        assert!(!selection.toggle(id("wall_1")));
        assert!(selection.is_empty());
        assert!(selection.toggle(id("wall_1")));
        assert!(selection.contains(&id("wall_1")));

        assert!(selection.deselect(&id("wall_1")));
        assert!(!selection.deselect(&id("wall_1")));
    }

    #[test]
    fn replace_and_select_only_drop_previous_ids() {
        let mut selection = Selection::new();
        selection.replace([id("b"), id("a"), id("c")]);
        assert_eq!(selection.sorted(), vec![id("a"), id("b"), id("c")]);

        selection.select_only(id("z"));
        assert_eq!(selection.sorted(), vec![id("z")]);

        selection.replace([id("x"), id("y")]);
        selection.retain(|candidate| candidate.as_str() != "x");
        assert_eq!(selection.sorted(), vec![id("y")]);

        selection.clear();
        assert!(selection.is_empty());
    }
}
