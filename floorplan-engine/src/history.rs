use std::collections::VecDeque;

/// 撤销栈默认保留的历史快照数量。
pub const HISTORY_LIMIT: usize = 50;

/// 线性撤销/重做历史：`past` / `present` / `future` 三段式快照栈。
///
/// 快照以值的形式保存，调用方提交后再修改自身数据不会影响已记录的快照。
/// `past` 只保留最近 `limit` 个条目，超出时丢弃最旧的一条。
#[derive(Debug, Clone)]
pub struct History<T> {
    past: VecDeque<T>,
    present: T,
    future: Vec<T>,
    limit: usize,
}

impl<T> History<T> {
    pub fn new(present: T) -> Self {
        Self::with_limit(present, HISTORY_LIMIT)
    }

    pub fn with_limit(present: T, limit: usize) -> Self {
        Self {
            past: VecDeque::new(),
            present,
            future: Vec::new(),
            limit,
        }
    }

    #[inline]
    pub fn present(&self) -> &T {
        &self.present
    }

    #[inline]
    pub fn limit(&self) -> usize {
        self.limit
    }

    #[inline]
    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    #[inline]
    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    #[inline]
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    #[inline]
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// 记录新快照：旧的 `present` 进入 `past`，`future` 清空。
    pub fn commit(&mut self, snapshot: T) {
        let previous = std::mem::replace(&mut self.present, snapshot);
        self.push_past(previous);
        self.future.clear();
    }

    /// 回退一步并返回新的 `present`；没有可撤销的历史时返回 `None`。
    pub fn undo(&mut self) -> Option<&T> {
        let previous = self.past.pop_back()?;
        let current = std::mem::replace(&mut self.present, previous);
        self.future.push(current);
        Some(&self.present)
    }

    /// 前进一步并返回新的 `present`；没有可重做的历史时返回 `None`。
    pub fn redo(&mut self) -> Option<&T> {
        let next = self.future.pop()?;
        let current = std::mem::replace(&mut self.present, next);
        self.push_past(current);
        Some(&self.present)
    }

    /// 丢弃全部历史，以 `present` 作为新的起点。
    pub fn reset(&mut self, present: T) {
        self.past.clear();
        self.future.clear();
        self.present = present;
    }

    fn push_past(&mut self, snapshot: T) {
        self.past.push_back(snapshot);
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
    }
}

impl<T: Default> Default for History<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_and_redo_walk_the_stack() {
        let mut history = History::new(vec![1]);
        history.commit(vec![1, 2]);
        history.commit(vec![1, 2, 3]);
        assert_eq!(history.past_len(), 2);

        assert_eq!(history.undo(), Some(&vec![1, 2]));
        assert_eq!(history.undo(), Some(&vec![1]));
        assert_eq!(history.undo(), None);
        assert_eq!(history.present(), &vec![1]);
        assert_eq!(history.future_len(), 2);

        assert_eq!(history.redo(), Some(&vec![1, 2]));
        assert_eq!(history.redo(), Some(&vec![1, 2, 3]));
        assert_eq!(history.redo(), None);
        assert_eq!(history.present(), &vec![1, 2, 3]);
    }

    #[test]
    fn commit_discards_redo_branch() {
        let mut history = History::new("a");
        history.commit("b");
        history.undo();
        assert!(history.can_redo());

        history.commit("c");
        assert!(!history.can_redo());
        assert_eq!(history.present(), &"c");
        assert_eq!(history.undo(), Some(&"a"));
    }

    #[test]
    fn past_is_bounded_to_limit() {
        let mut history = History::new(0usize);
        for value in 1..=120 {
            history.commit(value);
            assert!(history.past_len() <= HISTORY_LIMIT);
        }
        assert_eq!(history.past_len(), HISTORY_LIMIT);

        let mut steps = 0;
        while history.undo().is_some() {
            steps += 1;
        }
        assert_eq!(steps, HISTORY_LIMIT);
        // 最旧可达的快照是第 70 次提交
        assert_eq!(history.present(), &70);

        while history.redo().is_some() {}
        assert_eq!(history.present(), &120);
        assert_eq!(history.past_len(), HISTORY_LIMIT);
    }

    #[test]
    fn reset_clears_both_directions() {
        let mut history = History::with_limit(String::from("x"), 3);
        history.commit(String::from("y"));
        history.commit(String::from("z"));
        history.undo();
        history.reset(String::from("fresh"));
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.present(), "fresh");
        assert_eq!(history.limit(), 3);
    }
}
