use confsched_core::model::Block;
use confsched_core::repository::AgendaRepository;
use std::sync::Arc;

pub struct LoadAgendaUseCase {
    repository: Arc<dyn AgendaRepository>,
}

impl LoadAgendaUseCase {
    pub fn new(repository: Arc<dyn AgendaRepository>) -> Self {
        Self { repository }
    }

    /// Agenda blocks in start-time order.
    pub fn execute(&self) -> Vec<Block> {
        let mut blocks = self.repository.get_agenda();
        blocks.sort_by_key(|block| block.start_time);
        blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::at;
    use confsched_infrastructure::DefaultAgendaRepository;

    fn block(title: &str, start: &str, end: &str) -> Block {
        Block {
            title: title.to_string(),
            kind: "meal".to_string(),
            color: 0xff9b_dd7c,
            stroke_color: None,
            is_dark: false,
            start_time: at(start),
            end_time: at(end),
        }
    }

    #[test]
    fn test_blocks_are_ordered_by_start() {
        let repository = DefaultAgendaRepository::with_blocks(vec![
            block("Dinner", "2019-03-11T19:30:00+05:30", "2019-03-11T22:00:00+05:30"),
            block("Lunch", "2019-03-11T13:00:00+05:30", "2019-03-11T14:00:00+05:30"),
        ]);
        let titles: Vec<String> = LoadAgendaUseCase::new(Arc::new(repository))
            .execute()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, vec!["Lunch", "Dinner"]);
    }

    #[test]
    fn test_default_agenda() {
        let blocks = LoadAgendaUseCase::new(Arc::new(DefaultAgendaRepository::new())).execute();
        assert_eq!(blocks.len(), 5);
        assert_eq!(blocks[0].title, "Mehandi");
        assert!(blocks.windows(2).all(|w| w[0].start_time <= w[1].start_time));
    }
}
