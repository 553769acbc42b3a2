//! Built-in clip set for `vclip demo`.

use vclip_models::GeneratedClip;

/// (id, title, duration, score, start, end)
const DEMO_CLIPS: [(&str, &str, &str, u8, f64, f64); 6] = [
    (
        "1",
        "\"You won't BELIEVE what happens next!\" - Peak reaction moment",
        "0:28",
        94,
        754.0,
        782.0,
    ),
    (
        "2",
        "Epic fail compilation with hilarious commentary",
        "0:45",
        87,
        1455.0,
        1500.0,
    ),
    (
        "3",
        "Mind-blowing revelation that shocked everyone",
        "0:32",
        82,
        2720.0,
        2752.0,
    ),
    ("4", "Unexpected plot twist moment", "0:22", 75, 3730.0, 3752.0),
    ("5", "Crowd goes wild during this play", "0:38", 68, 4545.0, 4583.0),
    (
        "6",
        "Funny moment that everyone is talking about",
        "0:18",
        55,
        5400.0,
        5418.0,
    ),
];

pub fn demo_clips() -> Vec<GeneratedClip> {
    DEMO_CLIPS
        .iter()
        .map(|&(id, title, duration, score, start, end)| GeneratedClip {
            id: id.to_string(),
            title: title.to_string(),
            duration: duration.to_string(),
            viral_score: score,
            thumbnail_url: None,
            video_url: None,
            start_time: start,
            end_time: end,
        })
        .collect()
}
