use crate::results::{StatusTag, TestRecord};
use std::collections::BTreeSet;
use tracing::debug;

/// Display groups for the filter checkboxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TagGroup {
    Improved,
    Regressed,
}

impl TagGroup {
    pub fn all() -> [TagGroup; 2] {
        [TagGroup::Improved, TagGroup::Regressed]
    }

    pub fn members(&self) -> &'static [StatusTag] {
        match self {
            TagGroup::Improved => &[
                StatusTag::ImpStart,
                StatusTag::ExStart,
                StatusTag::EqStart,
                StatusTag::EqTarget,
                StatusTag::GtTarget,
            ],
            TagGroup::Regressed => &[
                StatusTag::UniStart,
                StatusTag::LtTarget,
                StatusTag::LtStart,
                StatusTag::ApxStart,
                StatusTag::Timeout,
                StatusTag::Crash,
                StatusTag::Error,
            ],
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            TagGroup::Improved => "improved",
            TagGroup::Regressed => "regressed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TagGroup::Improved => "Improved",
            TagGroup::Regressed => "Regressed",
        }
    }
}

/// Status tags currently hidden from the table and scatter plot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    excluded: BTreeSet<StatusTag>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_excluded(tags: impl IntoIterator<Item = StatusTag>) -> Self {
        FilterState {
            excluded: tags.into_iter().collect(),
        }
    }

    pub fn is_excluded(&self, tag: StatusTag) -> bool {
        self.excluded.contains(&tag)
    }

    pub fn is_empty(&self) -> bool {
        self.excluded.is_empty()
    }

    pub fn excluded(&self) -> impl Iterator<Item = StatusTag> + '_ {
        self.excluded.iter().copied()
    }

    pub fn exclude(&mut self, tag: StatusTag) {
        self.excluded.insert(tag);
    }

    pub fn include(&mut self, tag: StatusTag) {
        self.excluded.remove(&tag);
    }

    /// Flip one tag. Returns whether the tag is shown afterwards.
    pub fn toggle_tag(&mut self, tag: StatusTag) -> bool {
        let shown = if self.excluded.remove(&tag) {
            true
        } else {
            self.excluded.insert(tag);
            false
        };
        debug!(tag = %tag, shown, "toggled status filter");
        shown
    }

    /// A group's leader is checked when none of its members are hidden.
    pub fn group_checked(&self, group: TagGroup) -> bool {
        group.members().iter().all(|t| !self.is_excluded(*t))
    }

    /// Some but not all members hidden.
    pub fn group_partial(&self, group: TagGroup) -> bool {
        let hidden = group
            .members()
            .iter()
            .filter(|t| self.is_excluded(**t))
            .count();
        hidden > 0 && hidden < group.members().len()
    }

    /// Flip a group's leader: a checked leader hides every member, an
    /// unchecked one shows every member. Returns the leader's new state.
    pub fn toggle_group(&mut self, group: TagGroup) -> bool {
        let show = !self.group_checked(group);
        for tag in group.members() {
            if show {
                self.include(*tag);
            } else {
                self.exclude(*tag);
            }
        }
        debug!(group = group.key(), shown = show, "toggled status group");
        show
    }

    pub fn allows(&self, test: &TestRecord) -> bool {
        !self.is_excluded(test.status)
    }

    /// Tests that survive the filter, in their original order.
    pub fn visible<'a>(
        &'a self,
        tests: &'a [TestRecord],
    ) -> impl Iterator<Item = &'a TestRecord> + 'a {
        tests.iter().filter(move |t| self.allows(t))
    }
}
