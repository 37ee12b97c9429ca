//! Day-entry shape detection.
//!
//! Model output arrives either in the canonical `morning`/`afternoon`/`evening`
//! form or in the older `breakfast`/`lunch`/`dinner` form. [`DayShape::decode`]
//! classifies an entry once; [`DayShape::into_blocks`] funnels both forms through
//! the same [`Slot`] into the typed time blocks.

use super::fields::{scalar_text, Fields};
use crate::types::{AfternoonBlock, EveningBlock, MorningBlock};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DayPart {
    Morning,
    Afternoon,
    Evening,
}

impl DayPart {
    pub(crate) const ALL: [DayPart; 3] = [DayPart::Morning, DayPart::Afternoon, DayPart::Evening];

    pub(crate) fn block_key(self) -> &'static str {
        match self {
            DayPart::Morning => "morning",
            DayPart::Afternoon => "afternoon",
            DayPart::Evening => "evening",
        }
    }

    pub(crate) fn meal_key(self) -> &'static str {
        match self {
            DayPart::Morning => "breakfast",
            DayPart::Afternoon => "lunch",
            DayPart::Evening => "dinner",
        }
    }
}

/// A legacy meal value: either a sub-object or a bare value naming the food.
#[derive(Debug, Clone)]
pub(crate) enum MealSlot<'a> {
    Detailed(Fields<'a>),
    Bare(String),
}

impl<'a> MealSlot<'a> {
    fn decode(value: Option<&'a Value>) -> Self {
        match value {
            Some(value) if value.is_object() => MealSlot::Detailed(Fields::of(value)),
            Some(value) => MealSlot::Bare(scalar_text(value).unwrap_or_default()),
            None => MealSlot::Bare(String::new()),
        }
    }

    fn fields(&self) -> Fields<'a> {
        match self {
            MealSlot::Detailed(fields) => *fields,
            MealSlot::Bare(_) => Fields::empty(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum DayShape<'a> {
    Canonical {
        morning: Fields<'a>,
        afternoon: Fields<'a>,
        evening: Fields<'a>,
    },
    Legacy {
        entry: Fields<'a>,
        breakfast: MealSlot<'a>,
        lunch: MealSlot<'a>,
        dinner: MealSlot<'a>,
    },
}

/// Shape-neutral content of one time block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Slot {
    pub early_place: String,
    pub meal: String,
    pub place_to_visit: String,
    pub duration: String,
    pub transport_to_next: String,
}

impl<'a> DayShape<'a> {
    pub(crate) fn decode(entry: Fields<'a>) -> Self {
        let block_keys = DayPart::ALL.map(DayPart::block_key);
        if entry.has_all(&block_keys) {
            return DayShape::Canonical {
                morning: entry.object("morning"),
                afternoon: entry.object("afternoon"),
                evening: entry.object("evening"),
            };
        }

        DayShape::Legacy {
            entry,
            breakfast: MealSlot::decode(entry.get("breakfast")),
            lunch: MealSlot::decode(entry.get("lunch")),
            dinner: MealSlot::decode(entry.get("dinner")),
        }
    }

    pub(crate) fn is_legacy(&self) -> bool {
        matches!(self, DayShape::Legacy { .. })
    }

    pub(crate) fn into_blocks(self) -> (MorningBlock, AfternoonBlock, EveningBlock) {
        let [morning, afternoon, evening] = DayPart::ALL.map(|part| self.slot(part));
        (morning.into(), afternoon.into(), evening.into())
    }

    fn slot(&self, part: DayPart) -> Slot {
        match self {
            DayShape::Canonical {
                morning,
                afternoon,
                evening,
            } => {
                let block = match part {
                    DayPart::Morning => morning,
                    DayPart::Afternoon => afternoon,
                    DayPart::Evening => evening,
                };
                Slot {
                    early_place: block.text_or_empty(&["early_place"]),
                    meal: block.text_or_empty(&[part.meal_key()]),
                    place_to_visit: block.text_or_empty(&["place_to_visit"]),
                    duration: block.text_or_empty(&["duration"]),
                    transport_to_next: block.text_or_empty(&["transport_to_next"]),
                }
            }
            DayShape::Legacy {
                entry,
                breakfast,
                lunch,
                dinner,
            } => {
                let meal = match part {
                    DayPart::Morning => breakfast,
                    DayPart::Afternoon => lunch,
                    DayPart::Evening => dinner,
                };
                let fields = meal.fields();
                let food = match meal {
                    MealSlot::Bare(food) => food.clone(),
                    MealSlot::Detailed(fields) => fields.text_or_empty(&["food", part.meal_key()]),
                };
                let mut place_to_visit = fields.text(&["place", "place_to_visit"]);
                let mut early_place = None;
                if part == DayPart::Morning {
                    // Entry-level keys only ever described the morning.
                    place_to_visit = place_to_visit.or_else(|| entry.text(&["place_to_visit"]));
                    early_place = entry.text(&["early_place"]).or_else(|| fields.text(&["early_place"]));
                }
                Slot {
                    early_place: early_place.unwrap_or_default(),
                    meal: food,
                    place_to_visit: place_to_visit.unwrap_or_default(),
                    duration: fields.text_or_empty(&["duration"]),
                    transport_to_next: fields.text_or_empty(&["transport_to_next"]),
                }
            }
        }
    }
}

impl From<Slot> for MorningBlock {
    fn from(slot: Slot) -> Self {
        Self {
            early_place: slot.early_place,
            breakfast: slot.meal,
            place_to_visit: slot.place_to_visit,
            duration: slot.duration,
            transport_to_next: slot.transport_to_next,
        }
    }
}

impl From<Slot> for AfternoonBlock {
    fn from(slot: Slot) -> Self {
        Self {
            lunch: slot.meal,
            place_to_visit: slot.place_to_visit,
            duration: slot.duration,
            transport_to_next: slot.transport_to_next,
        }
    }
}

impl From<Slot> for EveningBlock {
    fn from(slot: Slot) -> Self {
        Self {
            dinner: slot.meal,
            place_to_visit: slot.place_to_visit,
            duration: slot.duration,
            transport_to_next: slot.transport_to_next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_shape_requires_all_three_blocks() {
        let entry = json!({"morning": {}, "afternoon": {}, "evening": null});
        assert!(!DayShape::decode(Fields::of(&entry)).is_legacy());

        let entry = json!({"morning": {}, "afternoon": {}});
        assert!(DayShape::decode(Fields::of(&entry)).is_legacy());
    }

    #[test]
    fn test_canonical_blocks_keep_values_and_fill_gaps() {
        let entry = json!({
            "morning": {"breakfast": "Bagel $6", "place_to_visit": "**Central Park**"},
            "afternoon": "not an object",
            "evening": {"dinner": "Ramen $15", "duration": 2}
        });
        let (morning, afternoon, evening) = DayShape::decode(Fields::of(&entry)).into_blocks();

        assert_eq!(morning.breakfast, "Bagel $6");
        assert_eq!(morning.place_to_visit, "**Central Park**");
        assert_eq!(morning.early_place, "");
        assert_eq!(afternoon, AfternoonBlock::default());
        assert_eq!(evening.dinner, "Ramen $15");
        assert_eq!(evening.duration, "2");
        assert_eq!(evening.transport_to_next, "");
    }

    #[test]
    fn test_legacy_bare_meal() {
        let entry = json!({"breakfast": "Pancakes $5"});
        let (morning, afternoon, _) = DayShape::decode(Fields::of(&entry)).into_blocks();

        assert_eq!(
            morning,
            MorningBlock {
                breakfast: "Pancakes $5".to_string(),
                ..MorningBlock::default()
            }
        );
        assert_eq!(afternoon, AfternoonBlock::default());
    }

    #[test]
    fn test_legacy_detailed_meals() {
        let entry = json!({
            "early_place": "Sunrise Point",
            "place_to_visit": "Entry level place",
            "breakfast": {"food": "Eggs $8", "duration": "1 hour"},
            "lunch": {"food": "Tacos $10", "place": "Old Town", "transport_to_next": "Bus, 3 mi, $2"},
            "dinner": {"dinner": "Steak $30", "place_to_visit": "Riverwalk"}
        });
        let (morning, afternoon, evening) = DayShape::decode(Fields::of(&entry)).into_blocks();

        assert_eq!(morning.early_place, "Sunrise Point");
        assert_eq!(morning.breakfast, "Eggs $8");
        assert_eq!(morning.place_to_visit, "Entry level place");
        assert_eq!(morning.duration, "1 hour");
        assert_eq!(afternoon.lunch, "Tacos $10");
        assert_eq!(afternoon.place_to_visit, "Old Town");
        assert_eq!(afternoon.transport_to_next, "Bus, 3 mi, $2");
        assert_eq!(evening.dinner, "Steak $30");
        assert_eq!(evening.place_to_visit, "Riverwalk");
    }

    #[test]
    fn test_legacy_meal_place_wins_over_entry_place() {
        let entry = json!({
            "place_to_visit": "Entry level place",
            "breakfast": {"food": "Eggs $8", "place": "Harbor"}
        });
        let (morning, _, _) = DayShape::decode(Fields::of(&entry)).into_blocks();
        assert_eq!(morning.place_to_visit, "Harbor");
    }
}
