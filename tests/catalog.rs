//! Catalog behavior against an in-memory engine.
//!
//! The reader holds canned reply lines; the writer captures every command
//! line the client sends.

use asterisk_agi_tokio::{
    AgiClient, AgiOptions, AgiResponse, ChannelStatus, DigitOutcome, SessionContext,
};

type MemClient<'a> = AgiClient<&'a [u8], Vec<u8>>;

fn client(replies: &str) -> MemClient<'_> {
    AgiClient::new(replies.as_bytes(), Vec::new(), AgiOptions::default())
}

fn written(agi: MemClient<'_>) -> Vec<u8> {
    let (_, out) = agi.into_parts();
    out
}

#[tokio::test]
async fn empty_required_arguments_never_reach_the_wire() {
    let mut agi = client("");

    assert_eq!(agi.database_del("", "k").await.unwrap(), 0);
    assert_eq!(agi.database_del("f", "").await.unwrap(), 0);
    assert_eq!(agi.database_deltree("", "tree").await.unwrap(), 0);
    assert_eq!(agi.database_get("", "k").await.unwrap(), "");
    assert_eq!(agi.database_put("f", "k", "").await.unwrap(), 0);
    assert_eq!(agi.get_variable("").await.unwrap(), "");
    assert_eq!(agi.get_full_variable("", "SIP/1").await.unwrap(), "");
    assert_eq!(agi.send_image("").await.unwrap(), -1);
    assert_eq!(agi.send_text("").await.unwrap(), -1);
    assert_eq!(agi.tdd_mode("").await.unwrap(), -1);
    assert_eq!(agi.set_autohangup("").await.unwrap(), 0);
    assert_eq!(agi.set_callerid("").await.unwrap(), 1);
    assert_eq!(agi.set_context("").await.unwrap(), 0);
    assert_eq!(agi.set_extension("").await.unwrap(), 0);
    assert_eq!(agi.set_music("", "default").await.unwrap(), 0);
    assert_eq!(agi.set_priority("").await.unwrap(), 0);
    assert_eq!(agi.set_variable("FOO", "").await.unwrap(), 1);
    assert_eq!(agi.verbose("", "1").await.unwrap(), 1);
    assert_eq!(agi.speech_create("").await.unwrap(), -1);
    assert_eq!(agi.speech_set("n", "").await.unwrap(), -1);
    assert_eq!(agi.speech_load_grammar("n", "").await.unwrap(), -1);
    assert_eq!(agi.speech_unload_grammar("").await.unwrap(), -1);
    assert_eq!(agi.speech_activate_grammar("").await.unwrap(), -1);
    assert_eq!(agi.speech_deactivate_grammar("").await.unwrap(), -1);
    assert_eq!(agi.gosub("ctx", "", "1", "a").await.unwrap(), -1);

    let mut outcomes = Vec::new();
    outcomes.push(agi.say_alpha("", "#").await.unwrap());
    outcomes.push(agi.say_date("0", "").await.unwrap());
    outcomes.push(agi.say_datetime("", "#", "", "").await.unwrap());
    outcomes.push(agi.say_digits("123", "").await.unwrap());
    outcomes.push(agi.say_number("", "#", "f").await.unwrap());
    outcomes.push(agi.say_phonetic("abc", "").await.unwrap());
    outcomes.push(agi.say_time("", "#").await.unwrap());
    outcomes.push(agi.wait_for_digit("").await.unwrap());
    assert!(outcomes
        .iter()
        .all(|o| *o == DigitOutcome::Failed));

    assert_eq!(
        agi.exec("", "opts").await.unwrap(),
        AgiResponse::dummy("-2", "")
    );
    assert_eq!(
        agi.get_data("", "100", "4").await.unwrap(),
        AgiResponse::dummy("-1", "")
    );
    assert_eq!(
        agi.get_option("menu", "", "").await.unwrap(),
        AgiResponse::dummy("-1", "endpos=0")
    );
    assert_eq!(
        agi.record_file("msg", "wav", "#", "", "", "", "").await.unwrap(),
        AgiResponse::dummy("-1", "(randomerror) endpos=0")
    );
    assert_eq!(
        agi.stream_file("", "#", "").await.unwrap(),
        AgiResponse::dummy("0", "endpos=0")
    );
    assert_eq!(
        agi.control_stream_file("", "", "", "", "", "").await.unwrap(),
        AgiResponse::dummy("0", "endpos=0")
    );
    assert_eq!(
        agi.speech_recognize("", "", "").await.unwrap(),
        AgiResponse::dummy("-1", "")
    );

    assert!(written(agi).is_empty());
}

#[tokio::test]
async fn rejection_data_matches_status_200() {
    let mut agi = client("");
    let resp = agi
        .record_file("", "wav", "#", "1000", "", "", "")
        .await
        .unwrap();
    assert_eq!(resp.status_code(), "200");
    assert_eq!(resp.endpos(), Some(0));
    assert_eq!(
        resp.annotation(),
        Some(asterisk_agi_tokio::ReplyAnnotation::RandomError)
    );
}

#[tokio::test]
async fn get_variable_returns_data_only_on_success() {
    let mut agi = client("200 result=1 hello\n200 result=0\n");
    assert_eq!(agi.get_variable("GREETING").await.unwrap(), "hello");
    assert_eq!(agi.get_variable("MISSING").await.unwrap(), "");
    assert_eq!(
        written(agi),
        b"GET VARIABLE GREETING\nGET VARIABLE MISSING\n"
    );
}

#[tokio::test]
async fn channel_status_maps_unknown_codes() {
    let mut agi = client("200 result=4\n200 result=99\n200 result=-1\n");
    let ringing = agi.channel_status("").await.unwrap();
    assert_eq!(ringing, ChannelStatus::Ringing);
    assert_eq!(ringing.code(), 4);
    assert_eq!(agi.channel_status("").await.unwrap().code(), -1);
    assert_eq!(agi.channel_status("").await.unwrap().code(), -1);
    assert_eq!(
        written(agi),
        b"CHANNEL STATUS\nCHANNEL STATUS\nCHANNEL STATUS\n"
    );
}

#[tokio::test]
async fn deltree_without_keytree_reports_engine_success() {
    // Engines answer result=1 here even when the family does not exist.
    let mut agi = client("200 result=1\n");
    assert_eq!(agi.database_deltree("no-such-family", "").await.unwrap(), 1);
    assert_eq!(written(agi), b"DATABASE DELTREE no-such-family\n");
}

#[tokio::test]
async fn exec_options_with_any_number_of_spaces() {
    for k in 0..6usize {
        let options = vec!["x"; k + 1].join(" ");
        let mut agi = client("200 result=0\n");
        agi.exec("NoOp", &options).await.unwrap();

        let line = String::from_utf8(written(agi)).unwrap();
        let sent = line
            .strip_prefix("EXEC NoOp ")
            .and_then(|rest| rest.strip_suffix('\n'))
            .unwrap();
        assert_eq!(sent.matches("\\ ").count(), k);
        assert_eq!(sent.replace("\\ ", " "), options);
    }
}

#[tokio::test]
async fn one_reply_consumed_per_command() {
    let mut agi = client("200 result=0\n200 result=1 v\n200 result=6\n");
    agi.answer().await.unwrap();
    assert_eq!(agi.get_variable("A").await.unwrap(), "v");
    assert_eq!(agi.channel_status("").await.unwrap(), ChannelStatus::Up);
    assert!(agi.noop("").await.is_err());
}

#[tokio::test]
async fn full_session_from_startup_block() {
    let mut input = String::new();
    let names = [
        "agi_request: demo.agi",
        "agi_channel: SIP/100-00000001",
        "agi_language: en",
        "agi_type: SIP",
        "agi_uniqueid: 1700000000.1",
        "agi_version: 20.5.0",
        "agi_callerid: 100",
        "agi_calleridname: Alice",
        "agi_callingpres: 0",
        "agi_callingani2: 0",
        "agi_callington: 0",
        "agi_callingtns: 0",
        "agi_dnid: 200",
        "agi_rdnis: unknown",
        "agi_context: default",
        "agi_extension: 200",
        "agi_priority: 1",
        "agi_enhanced: 0.0",
        "agi_accountcode: ",
        "agi_threadid: 140000000",
        "agi_arg_1: foo",
        "agi_arg_2: bar",
    ];
    for line in names {
        input.push_str(line);
        input.push('\n');
    }
    input.push('\n');
    input.push_str("200 result=0\n");

    let (mut agi, session): (MemClient<'_>, SessionContext) =
        AgiClient::start(input.as_bytes(), Vec::new())
            .await
            .unwrap();
    assert_eq!(session.args, vec!["foo", "bar"]);
    assert_eq!(session.caller_id_name, "Alice");
    assert_eq!(session.account_code, " ");
    assert!(!session.is_enhanced());

    assert_eq!(agi.answer().await.unwrap(), 0);
    assert_eq!(written(agi), b"ANSWER\n");
}

#[tokio::test]
async fn wait_for_digit_keeps_unexpected_codes() {
    let mut agi = client("200 result=300\n200 result=-2\n");
    let first = agi.wait_for_digit("1000").await.unwrap();
    assert_eq!(first, DigitOutcome::Other(300));
    assert_eq!(first.as_code(), 300);
    assert_eq!(agi.wait_for_digit("1000").await.unwrap().as_code(), -2);
}

#[tokio::test]
async fn latin1_bytes_do_not_end_the_session() {
    let mut input = b"agi_request: demo.agi\nagi_channel: SIP/1\n".to_vec();
    for _ in 2..7 {
        input.extend_from_slice(b"agi_x: y\n");
    }
    input.extend_from_slice(b"agi_calleridname: Jos\xE9\n\n");
    input.extend_from_slice(b"200 result=1 Jos\xE9\n200 result=0\n");

    let (mut agi, session) = AgiClient::start(&input[..], Vec::new())
        .await
        .unwrap();
    assert_eq!(session.caller_id_name, "Jos\u{FFFD}");

    assert_eq!(
        agi.get_variable("CALLERID(name)").await.unwrap(),
        "Jos\u{FFFD}"
    );
    assert_eq!(agi.answer().await.unwrap(), 0);
}
