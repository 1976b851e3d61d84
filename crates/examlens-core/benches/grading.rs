use criterion::{black_box, criterion_group, criterion_main, Criterion};

use examlens_core::grading::grade;
use examlens_core::insights::synthesize;
use examlens_core::model::{
    Answer, AnswerSet, AnswerType, CorrectAnswer, Exam, Question, QuestionTimes,
};

const CATEGORIES: [&str; 5] = [
    "Physics",
    "Mathematics",
    "Logical Reasoning",
    "Verbal Ability",
    "Chemistry",
];

fn make_exam(n: u32) -> Exam {
    let questions = (1..=n)
        .map(|id| {
            let multiple = id % 3 == 0;
            Question {
                id,
                text: format!("If the pattern holds, calculate term {id}"),
                options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                answer_type: if multiple {
                    AnswerType::Multiple
                } else {
                    AnswerType::Single
                },
                correct: if multiple {
                    CorrectAnswer::Multiple([0, 2].into())
                } else {
                    CorrectAnswer::Single(1)
                },
                category: CATEGORIES[id as usize % CATEGORIES.len()].into(),
                marks: None,
                negative_marks: None,
            }
        })
        .collect();

    Exam {
        id: "bench".into(),
        title: "Bench".into(),
        key: "BENCH1".into(),
        questions,
        duration_secs: 3600,
        negative_marking: 0.25,
        positive_marks: 1.0,
        created_at: None,
    }
}

fn make_answers(exam: &Exam) -> (AnswerSet, QuestionTimes) {
    let answers = exam
        .questions
        .iter()
        .filter(|q| q.id % 7 != 0)
        .map(|q| {
            let answer = if q.id % 2 == 0 {
                Answer::Single(1)
            } else {
                Answer::multiple([0, 2])
            };
            (q.id, answer)
        })
        .collect();
    let times = exam
        .questions
        .iter()
        .map(|q| (q.id, (q.id % 90) as f64))
        .collect();
    (answers, times)
}

fn bench_grade(c: &mut Criterion) {
    let mut group = c.benchmark_group("grade");

    for n in [10u32, 100, 1000] {
        let exam = make_exam(n);
        let (answers, _) = make_answers(&exam);
        group.bench_function(format!("questions={n}"), |b| {
            b.iter(|| grade(black_box(&exam), black_box(&answers)))
        });
    }

    group.finish();
}

fn bench_synthesize(c: &mut Criterion) {
    let mut group = c.benchmark_group("synthesize");

    for n in [10u32, 100, 1000] {
        let exam = make_exam(n);
        let (answers, times) = make_answers(&exam);
        let result = grade(&exam, &answers);
        group.bench_function(format!("questions={n}"), |b| {
            b.iter(|| {
                synthesize(
                    black_box(&result.category_scores),
                    black_box(result.score),
                    black_box(&times),
                    black_box(&exam.questions),
                    black_box(&answers),
                )
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_grade, bench_synthesize);
criterion_main!(benches);
