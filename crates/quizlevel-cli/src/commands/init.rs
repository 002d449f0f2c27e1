//! The `quizlevel init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("quizlevel.toml"), SAMPLE_CONFIG)?;
    write_if_missing(Path::new("history.json"), SAMPLE_HISTORY)?;

    println!("\nNext steps:");
    println!("  1. Edit quizlevel.toml to match your question sets");
    println!("  2. Run: quizlevel validate");
    println!("  3. Run: quizlevel assess --history history.json --user demo");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizlevel configuration

[assessment]
# Most recent in-band answers judged per level
window_size = 5
# Pass a level with strictly more correct answers than this
pass_threshold = 3

[[levels]]
level = 1
from = 1
to = 5

[[levels]]
level = 2
from = 6
to = 10

[[levels]]
level = 3
from = 11
to = 15

[[levels]]
level = 4
from = 16
to = 20

[[levels]]
level = 5
from = 21
to = 25
"#;

const SAMPLE_HISTORY: &str = r#"[
  {"username": "demo", "folder_name": "AMC 8 2020", "year": 2020, "question_number": 1,
   "set_identifier": "8", "category": "Algebra", "user_choice": "A", "correct_choice": "A",
   "answer_time_secs": 30, "attempted_at": "2023-01-01T10:00:00", "image_filename": "q1.png"},
  {"username": "demo", "folder_name": "AMC 8 2020", "year": 2020, "question_number": 2,
   "set_identifier": "8", "category": "Geometry", "user_choice": "C", "correct_choice": "C",
   "answer_time_secs": 45, "attempted_at": "2023-01-01T10:05:00", "image_filename": "q2.png"},
  {"username": "demo", "folder_name": "AMC 8 2020", "year": 2020, "question_number": 3,
   "set_identifier": "8", "category": "Algebra", "user_choice": "B", "correct_choice": "D",
   "answer_time_secs": 60, "attempted_at": "2023-01-01T10:09:00", "image_filename": "q3.png"},
  {"username": "demo", "folder_name": "AMC 8 2020", "year": 2020, "question_number": 4,
   "set_identifier": "8", "category": "Counting", "user_choice": "E", "correct_choice": "E",
   "answer_time_secs": 25, "attempted_at": "2023-01-01T10:12:00", "image_filename": "q4.png"},
  {"username": "demo", "folder_name": "AMC 8 2020", "year": 2020, "question_number": 5,
   "set_identifier": "8", "category": "Geometry", "user_choice": "B", "correct_choice": "B",
   "answer_time_secs": 40, "attempted_at": "2023-01-01T10:15:00", "image_filename": "q5.png"},
  {"username": "demo", "folder_name": "AMC 8 2020", "year": 2020, "question_number": 1,
   "set_identifier": "8", "category": "Algebra", "user_choice": "A", "correct_choice": "A",
   "answer_time_secs": 20, "attempted_at": "2023-01-01T10:18:00", "image_filename": "q1.png"},
  {"username": "demo", "folder_name": "AMC 8 2020", "year": 2020, "question_number": 7,
   "set_identifier": "8", "category": "Number Theory", "user_choice": "D", "correct_choice": "A",
   "answer_time_secs": 90, "attempted_at": "2023-01-01T10:25:00", "image_filename": "q7.png"}
]
"#;
