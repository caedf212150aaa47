use super::*;
use crate::chunker::Chunk;
use crate::embeddings::EmbeddingService;
use crate::loader::RecordMetadata;
use std::cell::RefCell;
use std::collections::HashMap;

struct TableEmbedder {
    vectors: HashMap<String, Vec<f32>>,
}

impl EmbeddingService for TableEmbedder {
    fn embed(&self, text: &str) -> crate::Result<Vec<f32>> {
        self.vectors.get(text).cloned().ok_or_else(|| {
            crate::RagError::EmbeddingService(format!("no stub vector for text: {text}"))
        })
    }
}

/// Generation stub that records requests and echoes the user message.
struct EchoGenerator {
    seen: RefCell<Vec<(String, String, GenerationParams)>>,
}

impl GenerationService for EchoGenerator {
    fn generate(
        &self,
        system_instruction: &str,
        user_message: &str,
        params: &GenerationParams,
    ) -> crate::Result<String> {
        self.seen.borrow_mut().push((
            system_instruction.to_string(),
            user_message.to_string(),
            *params,
        ));
        Ok(format!("echo: {user_message}"))
    }
}

fn titled_chunk(title: &str, text: &str, chunk_index: usize) -> Chunk {
    Chunk {
        text: text.to_string(),
        record_index: chunk_index,
        chunk_index: 0,
        metadata: RecordMetadata {
            title: title.to_string(),
            ..RecordMetadata::default()
        },
    }
}

fn answerer(top_k: usize) -> (QueryAnswerer, Arc<EchoGenerator>) {
    let embedder = Arc::new(TableEmbedder {
        vectors: HashMap::from([
            ("alpha text".to_string(), vec![1.0, 0.0]),
            ("beta text".to_string(), vec![0.8, 0.6]),
            ("gamma text".to_string(), vec![0.0, 1.0]),
            ("what is alpha?".to_string(), vec![1.0, 0.0]),
        ]),
    });
    let chunks = vec![
        titled_chunk("Alpha", "alpha text", 0),
        titled_chunk("Beta", "beta text", 1),
        titled_chunk("Gamma", "gamma text", 2),
    ];
    let index = VectorIndex::build(chunks, embedder, 16).expect("index builds");

    let generator = Arc::new(EchoGenerator {
        seen: RefCell::new(Vec::new()),
    });
    let answerer = QueryAnswerer::new(
        index,
        Arc::clone(&generator) as Arc<dyn GenerationService>,
        top_k,
        GenerationParams::default(),
    );
    (answerer, generator)
}

#[test]
fn context_contains_retrieved_chunks_in_order() {
    let (answerer, _) = answerer(2);
    let answer = answerer.answer("what is alpha?").expect("answer succeeds");

    assert_eq!(
        answer.context,
        "Alpha: alpha text\n\nBeta: beta text"
    );
}

#[test]
fn user_message_embeds_context_and_question() {
    let (answerer, generator) = answerer(2);
    answerer.answer("what is alpha?").expect("answer succeeds");

    let seen = generator.seen.borrow();
    assert_eq!(seen.len(), 1);

    let (system, user, params) = &seen[0];
    assert_eq!(system, SYSTEM_INSTRUCTION);
    assert!(user.starts_with("Answer the question using the context:\n\nContext:\n"));
    assert!(user.contains("Alpha: alpha text"));
    assert!(user.ends_with("Question: what is alpha?"));
    assert!((params.temperature - 0.3).abs() < f32::EPSILON);
}

#[test]
fn answer_text_is_service_response_verbatim() {
    let (answerer, _) = answerer(1);
    let answer = answerer.answer("what is alpha?").expect("answer succeeds");

    assert!(answer.text.starts_with("echo: Answer the question using the context:"));
}

#[test]
fn generation_failure_propagates_unchanged() {
    struct FailingGenerator;
    impl GenerationService for FailingGenerator {
        fn generate(
            &self,
            _: &str,
            _: &str,
            _: &GenerationParams,
        ) -> crate::Result<String> {
            Err(crate::RagError::GenerationService(
                "model overloaded".to_string(),
            ))
        }
    }

    let embedder = Arc::new(TableEmbedder {
        vectors: HashMap::from([
            ("only text".to_string(), vec![1.0]),
            ("question".to_string(), vec![1.0]),
        ]),
    });
    let index = VectorIndex::build(
        vec![titled_chunk("Only", "only text", 0)],
        embedder,
        16,
    )
    .expect("index builds");

    let answerer = QueryAnswerer::new(
        index,
        Arc::new(FailingGenerator),
        1,
        GenerationParams::default(),
    );

    let err = answerer.answer("question").expect_err("error must propagate");
    match err {
        crate::RagError::GenerationService(message) => {
            assert_eq!(message, "model overloaded");
        }
        other => panic!("expected GenerationService, got {other:?}"),
    }
}

#[test]
fn assemble_context_joins_with_fixed_separator() {
    let results = vec![
        crate::index::SearchResult {
            chunk: titled_chunk("First", "first text", 0),
            similarity: 0.9,
        },
        crate::index::SearchResult {
            chunk: titled_chunk("Second", "second text", 1),
            similarity: 0.5,
        },
    ];

    let context = assemble_context(&results);
    assert_eq!(context, "First: first text\n\nSecond: second text");
}

#[test]
fn empty_retrieval_yields_empty_context() {
    assert_eq!(assemble_context(&[]), "");
}
