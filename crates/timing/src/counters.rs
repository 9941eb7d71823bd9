use crate::api::CounterGroup;

/// Lookup over a job's hierarchical counter report.
pub struct CounterIndex {
    groups: Vec<CounterGroup>,
}

impl CounterIndex {
    pub fn new(groups: Vec<CounterGroup>) -> Self {
        CounterIndex { groups }
    }

    /// Index with no counters; every lookup answers `None`.
    pub fn empty() -> Self {
        CounterIndex { groups: Vec::new() }
    }

    /// Value of counter `name` within groups whose name contains
    /// `group_fragment`. Group names carry deployment-dependent package
    /// prefixes, hence the substring match; the counter name itself must
    /// match exactly and the first hit wins.
    pub fn lookup(&self, group_fragment: &str, name: &str) -> Option<i64> {
        self.groups
            .iter()
            .filter(|group| {
                group
                    .counter_group_name
                    .as_deref()
                    .is_some_and(|group_name| group_name.contains(group_fragment))
            })
            .flat_map(|group| group.counter.iter())
            .find(|counter| counter.name.as_deref() == Some(name))
            .and_then(|counter| counter.total_counter_value)
    }
}
