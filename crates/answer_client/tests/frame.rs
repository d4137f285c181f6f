use answer_client::{decode_frame, FrameDecoder};
use answer_core::StreamChunk;
use pretty_assertions::assert_eq;

fn answer(content: &str) -> StreamChunk {
    StreamChunk::Answer {
        content: content.to_string(),
    }
}

#[test]
fn decodes_data_lines_and_skips_noise() {
    let mut decoder = FrameDecoder::new(1024);
    let body = concat!(
        "data: {\"type\":\"status\",\"content\":\"searching\"}\n",
        "\n",
        ": keep-alive comment\n",
        "event: message\n",
        "data:{\"type\":\"answer\",\"content\":\"hi\",\"done\":false}\r\n",
        "\n",
    );

    let chunks = decoder.push(body.as_bytes());
    assert_eq!(
        chunks,
        vec![
            StreamChunk::Status {
                content: "searching".to_string()
            },
            answer("hi"),
        ]
    );
    assert_eq!(decoder.finish(), None);
}

#[test]
fn malformed_frames_do_not_stop_decoding() {
    let mut decoder = FrameDecoder::new(1024);
    let body = concat!(
        "data: {\"type\":\"answer\",\"content\":\"a\"}\n",
        "data: {not json}\n",
        "data: {\"type\":\"unknown\"}\n",
        "data: {\"type\":\"answer\",\"content\":\"b\"}\n",
    );

    assert_eq!(decoder.push(body.as_bytes()), vec![answer("a"), answer("b")]);
}

#[test]
fn frames_split_across_reads_are_reassembled() {
    let line = "data: {\"type\":\"answer\",\"content\":\"سلام دنیا\"}\n".as_bytes();
    let mut decoder = FrameDecoder::new(1024);

    // Split inside a multi-byte character.
    let split = line.iter().position(|b| *b >= 0x80).expect("non-ascii byte") + 1;
    assert!(decoder.push(&line[..split]).is_empty());
    assert_eq!(decoder.push(&line[split..]), vec![answer("سلام دنیا")]);
}

#[test]
fn unterminated_last_line_is_flushed_on_finish() {
    let mut decoder = FrameDecoder::new(1024);
    assert!(decoder
        .push(b"data: {\"type\":\"cancelled\"}")
        .is_empty());
    assert_eq!(
        decoder.finish(),
        Some(StreamChunk::Cancelled { content: None })
    );
    assert_eq!(decoder.finish(), None);
}

#[test]
fn oversized_line_is_dropped_and_decoding_resumes() {
    let mut decoder = FrameDecoder::new(64);
    let huge = format!(
        "data: {{\"type\":\"answer\",\"content\":\"{}\"}}",
        "x".repeat(200)
    );

    assert!(decoder.push(huge.as_bytes()).is_empty());
    let rest = b"\ndata: {\"type\":\"answer\",\"content\":\"ok\"}\n";
    assert_eq!(decoder.push(rest), vec![answer("ok")]);
}

#[test]
fn oversized_line_is_dropped_however_it_is_split() {
    let long = format!(
        "data: {{\"type\":\"status\",\"content\":\"{}\"}}\n",
        "x".repeat(40)
    );
    let ok = b"data:{\"type\":\"answer\",\"content\":\"ok\"}\n";
    assert!(long.len() > 48 && ok.len() <= 48);

    let mut whole = FrameDecoder::new(48);
    assert!(whole.push(long.as_bytes()).is_empty());
    assert_eq!(whole.push(ok), vec![answer("ok")]);

    let mut split = FrameDecoder::new(48);
    let (head, tail) = long.as_bytes().split_at(20);
    assert!(split.push(head).is_empty());
    assert!(split.push(tail).is_empty());
    assert_eq!(split.push(ok), vec![answer("ok")]);
}

#[test]
fn line_arriving_byte_by_byte_is_decoded_once() {
    let mut decoder = FrameDecoder::new(1024);
    let line = b"data: {\"type\":\"answer\",\"content\":\"slow\"}\n";

    let mut chunks = Vec::new();
    for byte in line.iter() {
        chunks.extend(decoder.push(std::slice::from_ref(byte)));
    }
    assert_eq!(chunks, vec![answer("slow")]);
    assert_eq!(decoder.finish(), None);
}

#[test]
fn decode_frame_requires_prefix() {
    assert_eq!(decode_frame(b"{\"type\":\"answer\",\"content\":\"x\"}"), None);
    assert_eq!(decode_frame(b""), None);
    assert_eq!(
        decode_frame(b"data: {\"type\":\"error\",\"content\":\"boom\"}"),
        Some(StreamChunk::Error {
            content: Some("boom".to_string())
        })
    );
}
