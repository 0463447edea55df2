use iori_mpd::{template::expand, ResolverConfig};

use super::resolve;
use crate::AssertWrapper;

#[test]
fn test_base_url_chain() -> anyhow::Result<()> {
    let manifest = r#"<MPD>
        <BaseURL>m/</BaseURL>
        <Period>
            <BaseURL>p/</BaseURL>
            <AdaptationSet>
                <BaseURL>as/</BaseURL>
                <Representation id="r"><BaseURL>rep/</BaseURL></Representation>
            </AdaptationSet>
        </Period>
    </MPD>"#;

    let config = ResolverConfig::new("http://h/d/manifest.mpd");
    let resolved = iori_mpd::resolve(manifest.as_bytes(), &config)?;
    assert_eq!(
        resolved.segments.get("r").assert_success(),
        ["http://h/d/m/p/as/rep/"]
    );

    Ok(())
}

#[test]
fn test_without_base_url_or_addressing() -> anyhow::Result<()> {
    let resolved =
        resolve(r#"<MPD><Period><AdaptationSet><Representation id="r" /></AdaptationSet></Period></MPD>"#)?;
    assert!(resolved.segments.get("r").assert_success().is_empty());
    assert!(resolved.diagnostics.is_empty());
    Ok(())
}

#[test]
fn test_number_padding() {
    assert_eq!(expand("$Number%03d$", "id", Some(7), None), "007");
    assert_eq!(expand("$Number$", "id", Some(7), None), "7");
}

#[test]
fn test_start_and_end_number() -> anyhow::Result<()> {
    let resolved = resolve(
        r#"<MPD><Period><AdaptationSet>
            <Representation id="r">
                <SegmentTemplate media="$Number$.m4s" startNumber="5" endNumber="7" />
            </Representation>
        </AdaptationSet></Period></MPD>"#,
    )?;
    assert_eq!(
        resolved.segments.get("r").assert_success(),
        [
            "http://test.test/5.m4s",
            "http://test.test/6.m4s",
            "http://test.test/7.m4s",
        ]
    );
    Ok(())
}

#[test]
fn test_timeline_numbers_and_times() -> anyhow::Result<()> {
    let resolved = resolve(
        r#"<MPD><Period><AdaptationSet>
            <SegmentTemplate media="$Number$_$Time$.m4s" startNumber="1">
                <SegmentTimeline><S t="0" d="10" r="2" /><S d="5" /></SegmentTimeline>
            </SegmentTemplate>
            <Representation id="r" />
        </AdaptationSet></Period></MPD>"#,
    )?;
    assert_eq!(
        resolved.segments.get("r").assert_success(),
        [
            "http://test.test/1_0.m4s",
            "http://test.test/2_10.m4s",
            "http://test.test/3_20.m4s",
            "http://test.test/4_30.m4s",
        ]
    );
    Ok(())
}

#[test]
fn test_segment_list_precedence() -> anyhow::Result<()> {
    let resolved = resolve(
        r#"<MPD><Period duration="PT10S"><AdaptationSet>
            <Representation id="r">
                <SegmentTemplate initialization="init.mp4" media="$Number$.m4s" duration="1" />
                <SegmentList><SegmentURL media="only.m4s" /></SegmentList>
            </Representation>
        </AdaptationSet></Period></MPD>"#,
    )?;
    assert_eq!(
        resolved.segments.get("r").assert_success(),
        ["http://test.test/only.m4s"]
    );
    Ok(())
}

#[test]
fn test_idempotence() -> anyhow::Result<()> {
    let data = include_str!("../fixtures/multi_period.mpd");
    let first = serde_json::to_vec(&resolve(data)?.segments)?;
    let second = serde_json::to_vec(&resolve(data)?.segments)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_root_url_is_the_anchor() -> anyhow::Result<()> {
    let data = include_str!("../fixtures/segment_list.mpd");

    let config = ResolverConfig::new("https://origin.example.org/vod/title/manifest.mpd?token=abc");
    let resolved = iori_mpd::resolve(data.as_bytes(), &config)?;
    assert_eq!(
        resolved.segments.get("audio-en").assert_success()[0],
        "https://origin.example.org/vod/title/audio/en/init.mp4"
    );

    let config = ResolverConfig {
        inherit_query: true,
        ..config
    };
    let resolved = iori_mpd::resolve(data.as_bytes(), &config)?;
    assert_eq!(
        resolved.segments.get("audio-en").assert_success()[0],
        "https://origin.example.org/vod/title/audio/en/init.mp4?token=abc"
    );

    Ok(())
}

#[test]
fn test_invalid_root_url() {
    let config = ResolverConfig::new("test.mpd");
    iori_mpd::resolve(b"<MPD />", &config).assert_error();
}

#[test]
fn test_malformed_document() {
    resolve("<MPD><Period>").assert_error();
    resolve("<MPD><Period></AdaptationSet></MPD>").assert_error();
}

#[test]
fn test_segment_limit_is_isolated() -> anyhow::Result<()> {
    let manifest = r#"<MPD><Period><AdaptationSet>
        <Representation id="endless">
            <SegmentTemplate media="$Number$.m4s" endNumber="18446744073709551615" />
        </Representation>
        <Representation id="short">
            <SegmentTemplate media="short-$Number$.m4s" endNumber="2" />
        </Representation>
    </AdaptationSet></Period></MPD>"#;

    let config = ResolverConfig {
        max_segments: 3,
        ..ResolverConfig::new("http://test.test/test.mpd")
    };
    let resolved = iori_mpd::resolve(manifest.as_bytes(), &config)?;

    assert_eq!(
        resolved.segments.get("endless").assert_success(),
        [
            "http://test.test/1.m4s",
            "http://test.test/2.m4s",
            "http://test.test/3.m4s",
        ]
    );
    assert_eq!(
        resolved.segments.get("short").assert_success(),
        ["http://test.test/short-1.m4s", "http://test.test/short-2.m4s"]
    );

    assert_eq!(resolved.diagnostics.len(), 1);
    assert_eq!(resolved.diagnostics[0].representation_id, "endless");
    assert!(matches!(
        resolved.diagnostics[0].error,
        iori_mpd::MpdError::TooManySegments(3)
    ));

    Ok(())
}
