use super::record::{SessionRecord, SessionStats};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;
const DEMO_EPOCH_MS: i64 = 1_760_000_000_000;

pub(super) fn demo_sessions() -> Vec<SessionRecord> {
    [
        ("thesis", "Thesis research", "Sources and drafts for chapter two", [6, 9, 2, 4], 18_400),
        ("recipes", "Recipes", "", [0, 12, 7, 3], 3_100),
        ("rust", "Learning Rust", "Ownership notes and exercise links", [3, 14, 1, 9], 9_750),
        ("trip", "Lisbon trip", "Bookings, maps and ideas", [2, 5, 11, 6], 1_900),
        ("reading", "Reading list", "", [8, 4, 0, 2], 22_300),
        ("garden", "Garden plan", "Planting calendar", [1, 3, 5, 1], 800),
    ]
    .into_iter()
    .enumerate()
    .map(
        |(index, (id, name, description, [documents, text_nodes, images, websites], words))| {
            let stats = SessionStats {
                documents,
                text_nodes,
                images,
                websites,
                total_words: words,
            };
            SessionRecord {
                id: id.to_owned(),
                name: name.to_owned(),
                description: (!description.is_empty()).then(|| description.to_owned()),
                node_count: stats.content_items() as u32,
                stats,
                last_modified: DEMO_EPOCH_MS - (index as i64 * 3 * DAY_MS),
            }
        },
    )
    .collect()
}
