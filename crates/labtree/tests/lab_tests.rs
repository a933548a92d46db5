use labtree::{build_lab_tree, Lab, Problem, ProblemSource, QuizBlock};

fn native_problem(id: &str, question: &str) -> Problem {
    let markup = format!(
        r#"<problem>
            <p>{question}</p>
            <multiplechoiceresponse>
                <choicegroup><choice correct="true">yes</choice></choicegroup>
            </multiplechoiceresponse>
        </problem>"#
    );
    Problem {
        id: id.to_string(),
        source: ProblemSource::NativeMarkup(markup),
    }
}

fn block(id: &str, slug: &str, problems: Vec<Problem>) -> QuizBlock {
    QuizBlock {
        id: id.to_string(),
        slug: slug.to_string(),
        problems,
    }
}

#[test]
fn test_two_blocks_one_problem_each() -> Result<(), Box<dyn std::error::Error>> {
    let lab = Lab {
        id: 7,
        quiz_blocks: vec![
            block("b1", "QuizblockIntro", vec![native_problem("p1", "First?")]),
            block("b2", "QuizblockFinal", vec![native_problem("p2", "Second?")]),
        ],
    };

    let root = build_lab_tree(&lab)?;
    assert_eq!(root.name, "QuizBlocks");
    assert!(root.attrib.is_empty());
    assert_eq!(root.children.len(), 2);

    for (child, (slug, sentence)) in root.children.iter().zip([
        ("QuizblockIntro", "First?"),
        ("QuizblockFinal", "Second?"),
    ]) {
        assert_eq!(child.name, "QuizBlock");
        assert_eq!(child.attr("Id"), Some(slug));
        assert_eq!(child.find_all("Quiz").count(), 1);
        let quiz = child.find("Quiz").ok_or("missing Quiz")?;
        assert_eq!(quiz.attr("Sentence"), Some(sentence));
    }
    Ok(())
}

#[test]
fn test_problem_order_within_block() -> Result<(), Box<dyn std::error::Error>> {
    let lab = Lab {
        id: 7,
        quiz_blocks: vec![block(
            "b1",
            "Quizblock1",
            vec![
                native_problem("p1", "One?"),
                native_problem("p2", "Two?"),
                native_problem("p3", "Three?"),
            ],
        )],
    };

    let root = build_lab_tree(&lab)?;
    let first_block = root.children.first().ok_or("missing block")?;
    let ids: Vec<Option<&str>> = first_block
        .find_all("Quiz")
        .map(|q| q.attr("Id"))
        .collect();
    assert_eq!(ids, [Some("p1"), Some("p2"), Some("p3")]);
    Ok(())
}

#[test]
fn test_empty_lab_builds_bare_root() -> Result<(), Box<dyn std::error::Error>> {
    let lab = Lab {
        id: 1,
        quiz_blocks: Vec::new(),
    };
    let root = build_lab_tree(&lab)?;
    assert_eq!(root.name, "QuizBlocks");
    assert!(root.children.is_empty());
    Ok(())
}

#[test]
fn test_one_bad_problem_fails_the_lab() {
    let lab = Lab {
        id: 1,
        quiz_blocks: vec![block(
            "b1",
            "Quizblock1",
            vec![
                native_problem("p1", "Fine?"),
                Problem {
                    id: "p2".to_string(),
                    source: ProblemSource::PlatformXml("<Quiz".to_string()),
                },
            ],
        )],
    };

    let err = build_lab_tree(&lab).unwrap_err();
    assert!(err.is_malformed_content());
}

#[cfg(feature = "serde")]
#[test]
fn test_lab_deserializes_from_record_json() -> Result<(), Box<dyn std::error::Error>> {
    let json = r#"{
        "id": 42,
        "quiz_blocks": [
            {
                "id": "block-1",
                "slug": "QuizblockIntro",
                "problems": [
                    {"id": "p1", "platform_xml": "<Quiz Id=\"q\"><Options/></Quiz>", "content": ""},
                    {"id": "p2", "content": "<problem><p>Q?</p><multiplechoiceresponse><choicegroup><choice correct=\"true\">A</choice></choicegroup></multiplechoiceresponse></problem>"}
                ]
            }
        ]
    }"#;

    let lab: Lab = serde_json::from_str(json)?;
    assert_eq!(lab.id, 42);
    assert!(matches!(
        lab.quiz_blocks[0].problems[0].source,
        ProblemSource::PlatformXml(_)
    ));
    assert!(matches!(
        lab.quiz_blocks[0].problems[1].source,
        ProblemSource::NativeMarkup(_)
    ));

    let root = build_lab_tree(&lab)?;
    assert_eq!(root.children.len(), 1);
    Ok(())
}
