use std::sync::Arc;

use crate::errors::LegatoError;
use crate::token::Mask;
use crate::{Segmenter, Vocabulary};

fn worker_for(pieces: &[(&str, f32)]) -> crate::segmenter::worker::Worker {
    let vocab = Vocabulary::from_pieces(pieces.iter().copied()).unwrap();
    Segmenter::new(vocab).new_worker()
}

fn surfaces(worker: &crate::segmenter::worker::Worker) -> Vec<String> {
    worker.token_iter().map(|t| t.surface().to_string()).collect()
}

fn masks(worker: &crate::segmenter::worker::Worker) -> Vec<Mask> {
    worker.token_iter().map(|t| t.mask()).collect()
}

#[test]
fn test_word_and_continuation() {
    let mut worker = worker_for(&[
        ("<unk>", 0.0),
        ("\u{2581}un", -1.0),
        ("able", -1.2),
        ("\u{2581}ly", -1.5),
    ]);
    worker.reset_span("\u{2581}unable");
    worker.segment().unwrap();

    assert_eq!(surfaces(&worker), vec!["\u{2581}un", "able"]);
    assert_eq!(masks(&worker), vec![Mask::None, Mask::Continuation]);
    assert_eq!(worker.token(1).total_score(), -2.2);
}

#[test]
fn test_unknown_run_merges() {
    let mut worker = worker_for(&[("<unk>", 0.0), ("a", -1.0)]);
    worker.reset_span("aqqa");
    worker.segment().unwrap();

    assert_eq!(surfaces(&worker), vec!["a", "qq", "a"]);
    assert_eq!(
        masks(&worker),
        vec![Mask::Continuation, Mask::Unknown, Mask::Continuation]
    );
    assert_eq!(worker.token(1).piece_id(), 0);
}

#[test]
fn test_lone_unknown_punctuation() {
    let mut worker = worker_for(&[("<unk>", 0.0), ("a", -1.0)]);
    worker.reset_span("a.a");
    worker.segment().unwrap();

    assert_eq!(surfaces(&worker), vec!["a", ".", "a"]);
    // The token after punctuation starts a fresh word.
    assert_eq!(
        masks(&worker),
        vec![Mask::Continuation, Mask::Punctuation, Mask::None]
    );
}

#[test]
fn test_whitespace_blocks_continuation() {
    let mut worker = worker_for(&[("<unk>", 0.0), ("a", -1.0)]);
    worker.reset_span("a a");
    worker.segment().unwrap();

    assert_eq!(
        masks(&worker),
        vec![Mask::Continuation, Mask::Whitespace, Mask::None]
    );
}

#[test]
fn test_tokens_tile_the_span() {
    let mut worker = worker_for(&[("<unk>", 0.0), ("ab", -1.0), ("cd", -1.0)]);
    worker.reset_span("abXYcd");
    worker.segment().unwrap();

    let mut pos = 0;
    for t in worker.token_iter() {
        assert_eq!(t.range_char().start, pos);
        pos = t.range_char().end;
    }
    assert_eq!(pos, 6);
}

#[test]
fn test_decoding_resumes_after_unknowns() {
    // The unknown fallback resets the propagated score, so pieces after a
    // long unknown run still compete on their own scores.
    let mut worker = worker_for(&[("<unk>", 0.0), ("a", -2.0), ("ab", -1.0), ("b", -2.0)]);
    worker.reset_span("xxxxab");
    worker.segment().unwrap();

    assert_eq!(surfaces(&worker), vec!["xxxx", "ab"]);
    assert_eq!(worker.token(0).mask(), Mask::Unknown);
    assert_eq!(worker.token(1).total_score(), -1.0);
}

#[test]
fn test_merged_unknown_offsets_cover_the_run() {
    let mut worker = worker_for(&[("<unk>", 0.0), ("a", -1.0)]);
    worker
        .reset_span_with_offsets("aqq", &[5, 6, 7])
        .unwrap();
    worker.segment().unwrap();

    assert_eq!(surfaces(&worker), vec!["a", "qq"]);
    assert_eq!(worker.token(1).original_offsets(), &[6, 7]);
}

#[test]
fn test_best_path_is_optimal() {
    // Compare the decoded score against an exhaustive enumeration of every
    // covering segmentation.
    let pieces = [
        ("<unk>", 0.0),
        ("a", -0.7),
        ("ab", -1.0),
        ("b", -0.5),
        ("abc", -2.5),
        ("c", -0.2),
        ("bc", -0.9),
    ];
    let input = "abc";

    fn best_score(chars: &[char], pieces: &[(&str, f32)]) -> Option<f32> {
        if chars.is_empty() {
            return Some(0.0);
        }
        let mut best = None;
        for (piece, score) in pieces {
            let piece: Vec<char> = piece.chars().collect();
            if chars.len() >= piece.len() && chars[..piece.len()] == piece[..] {
                if let Some(rest) = best_score(&chars[piece.len()..], pieces) {
                    let total = score + rest;
                    if best.is_none_or(|b| total > b) {
                        best = Some(total);
                    }
                }
            }
        }
        best
    }

    let chars: Vec<char> = input.chars().collect();
    let expected = best_score(&chars, &pieces[1..]).unwrap();

    let mut worker = worker_for(&pieces);
    worker.reset_span(input);
    worker.segment().unwrap();
    let decoded = worker.token(worker.num_tokens() - 1).total_score();
    assert_eq!(decoded, expected);
}

#[test]
fn test_longer_piece_beats_split() {
    let mut worker = worker_for(&[("<unk>", 0.0), ("a", -1.0), ("b", -1.0), ("ab", -1.5)]);
    worker.reset_span("ab");
    worker.segment().unwrap();

    assert_eq!(surfaces(&worker), vec!["ab"]);
    assert_eq!(worker.token(0).total_score(), -1.5);
}

#[test]
fn test_empty_span_is_an_error() {
    let mut worker = worker_for(&[("<unk>", 0.0)]);
    worker.reset_span("");
    assert!(matches!(
        worker.segment().unwrap_err(),
        LegatoError::EmptySpan
    ));
}

#[test]
fn test_workers_share_one_vocabulary() {
    let vocab = Arc::new(
        Vocabulary::from_pieces([("<unk>", 0.0), ("\u{2581}un", -1.0), ("able", -1.2)]).unwrap(),
    );
    let segmenter = Segmenter::from_shared_vocabulary(Arc::clone(&vocab));

    std::thread::scope(|scope| {
        for _ in 0..4 {
            let segmenter = segmenter.clone();
            scope.spawn(move || {
                let mut worker = segmenter.new_worker();
                for _ in 0..100 {
                    worker.reset_span("\u{2581}unable");
                    worker.segment().unwrap();
                    assert_eq!(worker.num_tokens(), 2);
                }
            });
        }
    });
}

#[test]
fn test_segment_from_loaded_model() {
    let model = "<unk>\t0.0\n\u{2581}Hello\t-5.2\n\u{2581}world\t-6.1\n!\t-3.0\n";
    let vocab = Vocabulary::from_model_reader(model.as_bytes()).unwrap();
    let mut worker = Segmenter::new(vocab).new_worker();

    worker.reset_span("\u{2581}Hello\u{2581}world!");
    worker.segment().unwrap();

    assert_eq!(
        surfaces(&worker),
        vec!["\u{2581}Hello", "\u{2581}world", "!"]
    );
    assert_eq!(
        masks(&worker),
        vec![Mask::None, Mask::None, Mask::Punctuation]
    );
}
