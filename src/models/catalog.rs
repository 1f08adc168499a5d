use serde::Serialize;

/// Difficulty label shown next to a class
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
    AllLevels,
}

#[derive(Clone, Debug, Serialize)]
pub struct MembershipPlan {
    pub id: &'static str,
    pub name: &'static str,
    /// Monthly price in rubles
    pub price: u32,
    pub class_count: u32,
    pub features: &'static [&'static str],
    pub popular: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct DanceClass {
    pub id: &'static str,
    pub name: &'static str,
    pub instructor: &'static str,
    pub level: Level,
}

#[derive(Clone, Debug, Serialize)]
pub struct TimeSlot {
    pub id: &'static str,
    pub time: &'static str,
    pub spots: u32,
}

/// Read-only listings shown by the portal.
///
/// Purchases are not validated against this catalog; callers pass the plan
/// name and class count they display.
#[derive(Clone, Debug, Serialize)]
pub struct Catalog {
    pub plans: Vec<MembershipPlan>,
    pub classes: Vec<DanceClass>,
    pub time_slots: Vec<TimeSlot>,
}

impl Catalog {
    /// Look a plan up by id or by display name
    pub fn find_plan(&self, key: &str) -> Option<&MembershipPlan> {
        self.plans.iter().find(|plan| plan.id == key || plan.name == key)
    }

    /// Look a class up by id or by display name
    pub fn find_class(&self, key: &str) -> Option<&DanceClass> {
        self.classes.iter().find(|class| class.id == key || class.name == key)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            plans: vec![
                MembershipPlan {
                    id: "basic",
                    name: "Basic",
                    price: 5900,
                    class_count: 8,
                    features: &[
                        "2 classes per week",
                        "Online booking",
                        "Basic dance materials",
                        "No registration fee",
                    ],
                    popular: false,
                },
                MembershipPlan {
                    id: "premium",
                    name: "Premium",
                    price: 9900,
                    class_count: 16,
                    features: &[
                        "Priority booking",
                        "Master class access",
                        "Personal progress tracking",
                        "Members-only events",
                        "Merchandise discounts",
                    ],
                    popular: true,
                },
                MembershipPlan {
                    id: "family",
                    name: "Family",
                    price: 14900,
                    class_count: 32,
                    features: &[
                        "Up to 4 family members",
                        "Priority booking",
                        "Master class access",
                        "Family dance events",
                        "Private family lessons twice a month",
                    ],
                    popular: false,
                },
            ],
            classes: vec![
                DanceClass {
                    id: "ballet",
                    name: "Ballet",
                    instructor: "Elena Petrova",
                    level: Level::Intermediate,
                },
                DanceClass {
                    id: "contemporary",
                    name: "Contemporary",
                    instructor: "Anna Sokolova",
                    level: Level::Beginner,
                },
                DanceClass {
                    id: "hiphop",
                    name: "Hip-Hop",
                    instructor: "Marcus Chen",
                    level: Level::Advanced,
                },
                DanceClass {
                    id: "jazz",
                    name: "Jazz",
                    instructor: "Sofia Rodriguez",
                    level: Level::Intermediate,
                },
            ],
            time_slots: vec![
                TimeSlot { id: "morning", time: "10:00 - 11:30", spots: 5 },
                TimeSlot { id: "afternoon", time: "14:00 - 15:30", spots: 3 },
                TimeSlot { id: "evening", time: "18:00 - 19:30", spots: 8 },
                TimeSlot { id: "late", time: "20:00 - 21:30", spots: 10 },
            ],
        }
    }
}
