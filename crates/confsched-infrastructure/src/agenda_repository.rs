use chrono::{DateTime, FixedOffset};
use confsched_core::model::Block;
use confsched_core::repository::AgendaRepository;
use tracing::warn;

const TYPE_HENNA: &str = "henna";
const TYPE_MEAL: &str = "meal";
const TYPE_BARANUGAMANA: &str = "baranugamana";
const TYPE_HASTAGRANTHI: &str = "hastagranthi";

const COLOR_HENNA: u32 = 0xff90_8d46;
const COLOR_KEYNOTE: u32 = 0xfffd_c93e;
const COLOR_MEAL: u32 = 0xff9b_dd7c;

/// The fixed agenda of the event.
pub struct DefaultAgendaRepository {
    blocks: Vec<Block>,
}

impl DefaultAgendaRepository {
    pub fn new() -> Self {
        let entries = [
            ("Mehandi", TYPE_HENNA, COLOR_HENNA, "2019-03-11T10:00:00+05:30", "2019-03-11T13:00:00+05:30"),
            ("Reception & Dinner", TYPE_MEAL, COLOR_MEAL, "2019-03-11T19:30:00+05:30", "2019-03-11T22:00:00+05:30"),
            ("Reception & Lunch", TYPE_MEAL, COLOR_MEAL, "2019-03-13T13:30:00+05:30", "2019-03-13T15:30:00+05:30"),
            ("Baranugamana", TYPE_BARANUGAMANA, COLOR_MEAL, "2019-03-13T17:30:00+05:30", "2019-03-13T19:30:00+05:30"),
            ("Hastagranthi", TYPE_HASTAGRANTHI, COLOR_KEYNOTE, "2019-03-13T23:03:00+05:30", "2019-03-13T23:18:00+05:30"),
        ];

        let blocks = entries
            .into_iter()
            .filter_map(|(title, kind, color, start, end)| {
                match (parse(start), parse(end)) {
                    (Some(start_time), Some(end_time)) => Some(Block {
                        title: title.to_string(),
                        kind: kind.to_string(),
                        color,
                        stroke_color: None,
                        is_dark: false,
                        start_time,
                        end_time,
                    }),
                    _ => {
                        warn!(title, "Skipping agenda block with invalid time");
                        None
                    }
                }
            })
            .collect();

        Self { blocks }
    }

    /// An agenda with caller-supplied blocks.
    pub fn with_blocks(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }
}

impl Default for DefaultAgendaRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl AgendaRepository for DefaultAgendaRepository {
    fn get_agenda(&self) -> Vec<Block> {
        self.blocks.clone()
    }
}

fn parse(instant: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(instant).ok()
}
