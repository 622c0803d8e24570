//! 登录、在线状态与连接生命周期的端到端测试

mod support;

use application::{ClientEvent, ServerEvent};
use domain::UserStatus;
use support::{find_event, TestApp};

#[tokio::test]
async fn test_login_snapshot_is_complete() {
    let app = TestApp::new();
    let (_, user, snapshot) = app.login("alice").await;

    assert_eq!(user.display_name, "alice");
    assert!(user.is_online);

    assert!(find_event(&snapshot, |e| matches!(e, ServerEvent::MessageHistory { .. })).is_some());
    assert!(find_event(&snapshot, |e| matches!(
        e,
        ServerEvent::UsersList { users } if users.len() == 1
    ))
    .is_some());
    assert!(find_event(&snapshot, |e| matches!(
        e,
        ServerEvent::FriendsList { friends } if friends.is_empty()
    ))
    .is_some());
    assert!(find_event(&snapshot, |e| matches!(
        e,
        ServerEvent::PendingRequests { requests } if requests.is_empty()
    ))
    .is_some());
    assert!(find_event(&snapshot, |e| matches!(e, ServerEvent::GroupsList { .. })).is_some());
    assert!(find_event(&snapshot, |e| matches!(e, ServerEvent::Notifications { .. })).is_some());
    // 全局广播的状态更新同样到达发起连接
    assert!(find_event(&snapshot, |e| matches!(
        e,
        ServerEvent::UserStatusUpdate { user: u } if u.id == user.id
    ))
    .is_some());
}

#[tokio::test]
async fn test_relogin_matches_existing_user_case_insensitively() {
    let app = TestApp::new();
    let (alice_conn, alice_user, _) = app.login("alice").await;
    app.disconnect(&alice_conn).await;

    // 大小写不同的显示名是同一个用户
    let (_, again, snapshot) = app.login("ALICE").await;
    assert_eq!(again.id, alice_user.id);
    assert_eq!(again.display_name, "alice");

    assert!(find_event(&snapshot, |e| matches!(
        e,
        ServerEvent::UsersList { users } if users.len() == 1
    ))
    .is_some());
}

#[tokio::test]
async fn test_relogin_as_different_user_moves_binding() {
    let app = TestApp::new();
    let (mut bob, _, _) = app.login("bob").await;
    let (mut conn, alice_user, _) = app.login("alice").await;
    bob.drain();
    conn.drain();

    // 同一连接在不退出的情况下以另一个身份重新登录
    app.send(
        &conn,
        ClientEvent::Login {
            display_name: "carol".to_string(),
        },
    )
    .await;
    conn.drain();

    // 发给旧身份的事件不会再送达这条连接
    app.send(
        &bob,
        ClientEvent::AddFriend {
            target_user_id: alice_user.id,
        },
    )
    .await;
    bob.drain();
    conn.assert_silent();
}

#[tokio::test]
async fn test_short_display_name_rejected() {
    let app = TestApp::new();
    let mut conn = app.connect().await;

    app.send(
        &conn,
        ClientEvent::Login {
            display_name: "a".to_string(),
        },
    )
    .await;

    let events = conn.drain();
    assert!(find_event(&events, |e| matches!(
        e,
        ServerEvent::Error { code, .. } if code == "VALIDATION_ERROR"
    ))
    .is_some());
}

#[tokio::test]
async fn test_events_before_login_are_unauthenticated() {
    let app = TestApp::new();
    let mut conn = app.connect().await;

    app.send(&conn, ClientEvent::GetFriends).await;

    let events = conn.drain();
    assert!(find_event(&events, |e| matches!(
        e,
        ServerEvent::Error { code, .. } if code == "UNAUTHENTICATED"
    ))
    .is_some());
}

#[tokio::test]
async fn test_status_update_broadcasts_to_all() {
    let app = TestApp::new();
    let (mut alice, alice_user, _) = app.login("alice").await;
    let (mut bob, _, _) = app.login("bob").await;
    alice.drain();
    bob.drain();

    app.send(
        &alice,
        ClientEvent::UpdateStatus {
            status: UserStatus::Away,
        },
    )
    .await;

    for conn in [&mut alice, &mut bob] {
        let events = conn.drain();
        assert!(find_event(&events, |e| matches!(
            e,
            ServerEvent::UserStatusUpdate { user }
                if user.id == alice_user.id && user.status == UserStatus::Away && user.is_online
        ))
        .is_some());
    }
}

#[tokio::test]
async fn test_disconnect_broadcasts_offline() {
    let app = TestApp::new();
    let (alice, alice_user, _) = app.login("alice").await;
    let (mut bob, _, _) = app.login("bob").await;
    bob.drain();

    app.disconnect(&alice).await;

    let events = bob.drain();
    assert!(find_event(&events, |e| matches!(
        e,
        ServerEvent::UserStatusUpdate { user }
            if user.id == alice_user.id && !user.is_online
    ))
    .is_some());
}

#[tokio::test]
async fn test_offline_user_remains_searchable() {
    let app = TestApp::new();
    let (bob_conn, bob_user, _) = app.login("bob").await;
    app.disconnect(&bob_conn).await;

    let (mut alice, _, _) = app.login("alice").await;
    alice.drain();

    app.send(
        &alice,
        ClientEvent::SearchUsers {
            term: "bo".to_string(),
        },
    )
    .await;

    let events = alice.drain();
    assert!(find_event(&events, |e| matches!(
        e,
        ServerEvent::SearchResults { users }
            if users.len() == 1
                && users[0].id == bob_user.id
                && !users[0].is_online
                && users[0].is_friend == Some(false)
                && users[0].has_pending_request == Some(false)
    ))
    .is_some());
}

#[tokio::test]
async fn test_multi_device_delivery_and_partial_disconnect() {
    let app = TestApp::new();
    let (mut alice_phone, alice_user, _) = app.login("alice").await;
    let (mut alice_laptop, _, _) = app.login("alice").await;
    let (mut bob, _, _) = app.login("bob").await;
    alice_phone.drain();
    alice_laptop.drain();
    app.befriend(&mut bob, &mut alice_phone, &alice_user).await;
    alice_laptop.drain();

    app.send(
        &bob,
        ClientEvent::SendMessage {
            recipient_id: Some(alice_user.id),
            group_id: None,
            text: "ping".to_string(),
            kind: None,
        },
    )
    .await;

    // 两台设备都收到消息
    for conn in [&mut alice_phone, &mut alice_laptop] {
        let events = conn.drain();
        assert!(find_event(&events, |e| matches!(
            e,
            ServerEvent::NewMessage { message } if message.message.text == "ping"
        ))
        .is_some());
    }

    // 一台设备断开后用户仍在线，不广播离线
    bob.drain();
    app.disconnect(&alice_phone).await;
    bob.assert_silent();

    // 最后一台断开才广播离线
    app.disconnect(&alice_laptop).await;
    let events = bob.drain();
    assert!(find_event(&events, |e| matches!(
        e,
        ServerEvent::UserStatusUpdate { user } if !user.is_online
    ))
    .is_some());
}

#[tokio::test]
async fn test_single_connection_mode_evicts_previous_session() {
    let app = TestApp::with_options(true, true);
    let (mut first, user, _) = app.login("alice").await;
    first.drain();

    let (mut second, same_user, _) = app.login("alice").await;
    assert_eq!(same_user.id, user.id);
    second.drain();

    // 旧连接被强制下线且不再接收该用户的事件
    let events = first.drain();
    assert!(find_event(&events, |e| matches!(e, ServerEvent::ForcedLogout)).is_some());
    assert_eq!(app.registry.identity(first.id).await, None);
    assert_eq!(app.registry.resolve(user.id).await.len(), 1);
}
