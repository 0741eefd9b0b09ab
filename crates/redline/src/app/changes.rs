use super::App;

impl App {
    /// Number of change records in the active changelog
    pub fn change_count(&self) -> usize {
        self.result()
            .map(|result| result.changelog.changes.len())
            .unwrap_or(0)
    }

    pub fn select_next_change(&mut self, count: usize) {
        let last = self.change_count().saturating_sub(1);
        self.selected_change = self.selected_change.saturating_add(count).min(last);
    }

    pub fn select_prev_change(&mut self, count: usize) {
        self.selected_change = self.selected_change.saturating_sub(count);
    }

    pub fn select_first_change(&mut self) {
        self.selected_change = 0;
    }

    pub fn select_last_change(&mut self) {
        self.selected_change = self.change_count().saturating_sub(1);
    }

    /// Resolved citations as (change index, line number)
    pub fn resolved_citations(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.session
            .citations()
            .iter()
            .enumerate()
            .filter_map(|(idx, citation)| citation.line_number.map(|line| (idx, line)))
    }
}
