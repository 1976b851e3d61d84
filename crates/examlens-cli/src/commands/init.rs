//! The `examlens init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("examlens.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("exams")?;
    write_if_missing(Path::new("exams/sample.toml"), SAMPLE_EXAM)?;

    std::fs::create_dir_all("attempts")?;
    write_if_missing(Path::new("attempts/sample.json"), SAMPLE_ATTEMPT)?;

    println!("\nNext steps:");
    println!("  1. Run: examlens validate --exam exams/sample.toml");
    println!("  2. Run: examlens grade --exam exams/sample.toml --attempt attempts/sample.json");
    println!("  3. Edit exams/sample.toml or import your own: examlens import --input bank.txt --output exams/bank.toml");

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

const SAMPLE_CONFIG: &str = r#"# examlens configuration

output_dir = "./examlens-results"
default_format = "all"

[import]
positive_marks = 1.0
negative_marking = 0.25
duration_secs = 1800

[compare]
threshold = 5.0
"#;

const SAMPLE_EXAM: &str = r#"[exam]
id = "sample"
title = "Sample Aptitude Test"
key = "SAMPLE"
duration_secs = 900
negative_marking = 0.25
positive_marks = 1.0

[[questions]]
id = 1
text = "Define inertia."
options = ["Resistance to change in motion", "A unit of energy", "A type of force", "Rate of heat flow"]
type = "single"
correct = 0
category = "Physics"

[[questions]]
id = 2
text = "Calculate 15% of 240."
options = ["24", "36", "32", "40"]
type = "single"
correct = 1
category = "Mathematics"

[[questions]]
id = 3
text = "What comes next in the sequence 3, 6, 12, 24?"
options = ["30", "36", "48", "42"]
type = "single"
correct = 2
category = "Logical Reasoning"

[[questions]]
id = 4
text = "Select all prime values."
options = ["2", "9", "11", "15"]
type = "multiple"
correct = [0, 2]
category = "Mathematics"
marks = 2.0

[[questions]]
id = 5
text = "Sound travels faster than light."
options = ["True", "False"]
type = "boolean"
correct = 1
category = "Physics"
"#;

const SAMPLE_ATTEMPT: &str = r#"{
  "exam_id": "sample",
  "student_id": "student-1",
  "answers": {
    "1": 0,
    "2": 1,
    "3": 0,
    "4": [0, 2]
  },
  "question_times": {
    "1": 25.0,
    "2": 48.5,
    "3": 70.0,
    "4": 41.0
  }
}
"#;
