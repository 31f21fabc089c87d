//! Property-based tests using proptest

use proptest::prelude::*;
use tfmini_core::{
    constants::{FRAME_LEN, SYNC_BYTE},
    decode_next_frame,
    encoder::FrameBuilder,
    scanner::scan_stream,
    DecodeError, Frame, FrameDecoder,
};

fn non_sync_noise(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>().prop_filter("no sync byte", |b| *b != SYNC_BYTE), 0..max_len)
}

proptest! {
    #[test]
    fn prop_encode_decode(
        distance in any::<u16>(),
        strength in any::<u16>(),
        integration_time in any::<u8>()
    ) {
        let encoded = FrameBuilder::new(distance)
            .strength(strength)
            .integration_time(integration_time)
            .build();

        let frame = decode_next_frame(&mut &encoded[..]).unwrap();

        prop_assert_eq!(frame.distance(), distance);
        prop_assert_eq!(frame.strength(), strength);
        prop_assert_eq!(frame.integration_time(), integration_time);
        prop_assert_eq!(Frame::from_bytes(&encoded), Ok(frame));
    }

    #[test]
    fn prop_noise_without_sync_never_yields_frames(noise in non_sync_noise(4096)) {
        let mut decoder = FrameDecoder::new(noise.as_slice());

        prop_assert_eq!(decoder.next_frame(), Ok(None));
        prop_assert_eq!(decoder.stats().bytes_read, noise.len());
    }

    #[test]
    fn prop_decode_never_panics(data in prop::collection::vec(any::<u8>(), 0..4096)) {
        // Every outcome is either a checked frame or truncation
        for result in FrameDecoder::new(data.as_slice()) {
            match result {
                Ok(frame) => prop_assert_eq!(frame.checksum(), frame.compute_checksum()),
                Err(e) => {
                    let is_truncated = matches!(e, DecodeError::Truncated { .. });
                    prop_assert!(is_truncated);
                }
            }
        }
    }

    #[test]
    fn prop_frames_recovered_after_noise(
        noise in non_sync_noise(256),
        distances in prop::collection::vec(0u16..12_000, 1..20)
    ) {
        let mut stream = noise.clone();
        for d in &distances {
            stream.extend_from_slice(&FrameBuilder::new(*d).build());
        }

        let located = scan_stream(&stream);

        prop_assert_eq!(located.len(), distances.len());
        for (i, (lf, d)) in located.iter().zip(&distances).enumerate() {
            prop_assert_eq!(lf.frame.distance(), *d);
            prop_assert_eq!(lf.offset, noise.len() + i * FRAME_LEN);
        }
    }

    #[test]
    fn prop_corrupted_frame_is_skipped(
        bad in any::<u16>(),
        good in any::<u16>()
    ) {
        let mut stream = FrameBuilder::new(bad).corrupt_checksum().build().to_vec();
        stream.extend_from_slice(&FrameBuilder::new(good).build());

        let frames: Vec<Frame> = FrameDecoder::new(stream.as_slice())
            .filter_map(Result::ok)
            .collect();

        prop_assert!(frames.iter().all(|f| f.checksum() == f.compute_checksum()));
        prop_assert_eq!(frames.last().map(Frame::distance), Some(good));
    }
}
