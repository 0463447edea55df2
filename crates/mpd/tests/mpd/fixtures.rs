use iori_mpd::{segment::Strategy, MpdError};

use super::resolve;
use crate::AssertWrapper;

#[test]
fn test_multi_period() -> anyhow::Result<()> {
    let data = include_str!("../fixtures/multi_period.mpd");
    let resolved = resolve(data)?;
    assert!(resolved.diagnostics.is_empty());

    let ids: Vec<_> = resolved.segments.iter().map(|(id, _)| id).collect();
    assert_eq!(ids, vec!["video=1000", "video=2000", "subs-en"]);

    let video = resolved.segments.get("video=1000").assert_success();
    // 1 + 3 segments from the timeline of the first period,
    // 1 + ceil(55s / 2s) segments from the second one.
    assert_eq!(video.len(), 4 + 1 + 28);
    assert_eq!(
        &video[..5],
        [
            "http://test.test/dash/p0/video=1000/init.mp4",
            "http://test.test/dash/p0/video=1000/0.m4s",
            "http://test.test/dash/p0/video=1000/180000.m4s",
            "http://test.test/dash/p0/video=1000/360000.m4s",
            "https://cdn.example.com/p1/video=1000/init.mp4",
        ]
    );
    assert_eq!(video[5], "https://cdn.example.com/p1/video=1000/0000.m4s");
    assert_eq!(
        video.last().assert_success(),
        "https://cdn.example.com/p1/video=1000/0027.m4s"
    );

    let video = resolved.segments.get("video=2000").assert_success();
    assert_eq!(
        video,
        [
            "http://test.test/dash/p0/video=2000/init.mp4",
            "http://test.test/dash/p0/video=2000/0.m4s",
            "http://test.test/dash/p0/video=2000/180000.m4s",
            "http://test.test/dash/p0/video=2000/360000.m4s",
        ]
    );

    let subtitles = resolved.segments.get("subs-en").assert_success();
    assert_eq!(
        subtitles,
        [
            "http://test.test/dash/p0/subs/en.vtt",
            "https://cdn.example.com/p1/subs/en-2.vtt",
        ]
    );

    Ok(())
}

#[test]
fn test_segment_list() -> anyhow::Result<()> {
    let data = include_str!("../fixtures/segment_list.mpd");
    let resolved = resolve(data)?;
    assert!(resolved.diagnostics.is_empty());

    assert_eq!(
        resolved.segments.get("audio-en").assert_success(),
        [
            "http://test.test/audio/en/init.mp4",
            "http://test.test/audio/en/seg-1.m4s",
            "http://test.test/audio/en/seg-2.m4s",
        ]
    );
    assert_eq!(
        resolved.segments.get("audio-fr").assert_success(),
        [
            "http://test.test/audio/fr/full.mp4",
            "http://test.test/audio/fr/",
        ]
    );

    Ok(())
}

#[test]
fn test_errors_are_isolated() -> anyhow::Result<()> {
    let data = include_str!("../fixtures/isolated_errors.mpd");
    let resolved = resolve(data)?;

    assert_eq!(resolved.segments.len(), 3);
    assert!(resolved.segments.get("broken").assert_success().is_empty());
    assert_eq!(
        resolved.segments.get("counted").assert_success(),
        ["http://test.test/counted/"]
    );
    assert_eq!(
        resolved.segments.get("ranged").assert_success(),
        [
            "http://test.test/init.mp4",
            "http://test.test/ranged_5.m4s",
            "http://test.test/ranged_6.m4s",
            "http://test.test/ranged_7.m4s",
        ]
    );

    assert_eq!(resolved.diagnostics.len(), 2);
    let broken = &resolved.diagnostics[0];
    assert_eq!(broken.representation_id, "broken");
    assert_eq!(broken.period, 0);
    assert!(matches!(broken.error, MpdError::UrlResolution { .. }));

    let counted = &resolved.diagnostics[1];
    assert_eq!(counted.representation_id, "counted");
    assert!(matches!(counted.error, MpdError::InvalidDurationFormat(_)));

    Ok(())
}

#[test]
fn test_missing_representation_id_is_fatal() {
    let data = include_str!("../fixtures/missing_id.mpd");
    let error = resolve(data).err().assert_success();
    assert!(matches!(error, MpdError::Parse(_)));
}

#[test]
fn test_strategy_per_representation() -> anyhow::Result<()> {
    let data = include_str!("../fixtures/multi_period.mpd");
    let mpd = iori_mpd::mpd::parse(data.as_bytes())?;
    let root = url::Url::parse(super::ROOT_URL)?;

    let period = &mpd.periods[1];
    let adaptation_set = &period.adaptation_sets[0];
    let representation = &adaptation_set.representations[0];
    let base_url = iori_mpd::base_url::resolve_chain(
        &root,
        &[
            mpd.base_url(),
            period.base_url(),
            adaptation_set.base_url(),
            representation.base_url(),
        ],
        false,
    )?;

    let segments = iori_mpd::segment::SegmentEnumerator {
        representation,
        addressing: iori_mpd::segment::InheritedAddressingValues::resolve(
            period,
            adaptation_set,
            representation,
        ),
        period_duration: iori_mpd::duration::PeriodDuration::of(&mpd, 1, true),
        base_url: &base_url,
        has_base_url: true,
        inherit_query: false,
        max_segments: iori_mpd::config::DEFAULT_MAX_SEGMENTS,
    }
    .enumerate();

    assert_eq!(
        segments.strategy,
        Strategy::DurationDerived { period_seconds: 55.0 }
    );
    assert_eq!(segments.urls.len(), 29);

    Ok(())
}
