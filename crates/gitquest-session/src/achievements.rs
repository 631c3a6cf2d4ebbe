/// A badge the player can earn once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

pub const FIRST_STEPS: &str = "first-steps";
pub const BRANCH_WIZARD: &str = "branch-wizard";
pub const TIME_REVERTER: &str = "time-reverter";
pub const TIMELINE_MASTER: &str = "timeline-master";
pub const PERFECTIONIST: &str = "perfectionist";
pub const EXPLORER: &str = "explorer";

pub const ACHIEVEMENTS: &[Achievement] = &[
    Achievement {
        id: FIRST_STEPS,
        title: "First Steps",
        description: "Successfully initialized your first Git repository and learned the basics.",
        icon: "\u{1F31F}",
    },
    Achievement {
        id: BRANCH_WIZARD,
        title: "Branch Wizard",
        description: "Mastered the art of branching and merging parallel timelines.",
        icon: "\u{1F52E}",
    },
    Achievement {
        id: "conflict-resolver",
        title: "Conflict Resolver",
        description: "Successfully resolved merge conflicts without breaking the timeline.",
        icon: "\u{2694}\u{FE0F}",
    },
    Achievement {
        id: TIME_REVERTER,
        title: "Time Reverter",
        description: "Undid dangerous changes and saved the timeline from corruption.",
        icon: "\u{23F0}",
    },
    Achievement {
        id: TIMELINE_MASTER,
        title: "Timeline Master",
        description: "Completed all levels and restored order to the universe.",
        icon: "\u{1F451}",
    },
    Achievement {
        id: "speedrunner",
        title: "Speedrunner",
        description: "Completed a level in record time.",
        icon: "\u{26A1}",
    },
    Achievement {
        id: PERFECTIONIST,
        title: "Perfectionist",
        description: "Completed a level without any incorrect commands.",
        icon: "\u{1F48E}",
    },
    Achievement {
        id: EXPLORER,
        title: "Explorer",
        description: "Used the hint system to learn about Git commands.",
        icon: "\u{1F50D}",
    },
    Achievement {
        id: "comeback-kid",
        title: "Comeback Kid",
        description: "Recovered from multiple failed attempts and succeeded.",
        icon: "\u{1F4AA}",
    },
    Achievement {
        id: "git-guru",
        title: "Git Guru",
        description: "Demonstrated mastery of advanced Git concepts.",
        icon: "\u{1F9D9}",
    },
];

pub fn find(id: &str) -> Option<&'static Achievement> {
    ACHIEVEMENTS.iter().find(|a| a.id == id)
}

/// Achievement granted for finishing a given level, if any.
pub fn for_level(level_id: u32) -> Option<&'static str> {
    match level_id {
        1 => Some(FIRST_STEPS),
        3 => Some(BRANCH_WIZARD),
        4 => Some(TIME_REVERTER),
        5 => Some(TIMELINE_MASTER),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_ids_are_unique() {
        let ids: HashSet<_> = ACHIEVEMENTS.iter().map(|a| a.id).collect();
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn level_rewards_exist_in_catalog() {
        for level in 1..=5 {
            if let Some(id) = for_level(level) {
                assert!(find(id).is_some(), "{id}");
            }
        }
        assert_eq!(for_level(2), None);
        assert_eq!(find("explorer").map(|a| a.title), Some("Explorer"));
    }
}
