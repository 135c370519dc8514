//! Drive the C ABI against the live mock server, playing the part of a
//! C host: read the request structs, execute them with ureq, and hand the
//! responses back as `FfiHttpResponse`.

use std::ffi::{CStr, CString};

use todo_sync_ffi::types::{FfiErrorCode, FfiErrorKind, FfiHttpMethod, FfiHttpRequest, FfiHttpResponse};
use todo_sync_ffi::{
    todo_free_batch, todo_free_list, todo_free_request, todo_sync_active_count,
    todo_sync_begin_create, todo_sync_begin_load, todo_sync_begin_remove,
    todo_sync_clear_completed, todo_sync_completed_count, todo_sync_error, todo_sync_finish_create,
    todo_sync_finish_load, todo_sync_finish_remove, todo_sync_free, todo_sync_new, todo_sync_visible,
};

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

/// Execute the request and free it. Returns (status, body).
fn execute(req: *mut FfiHttpRequest) -> (u16, CString) {
    assert!(!req.is_null());
    let r = unsafe { &*req };
    let path = unsafe { CStr::from_ptr(r.path) }.to_str().unwrap().to_string();
    let body = if r.body.is_null() {
        None
    } else {
        Some(unsafe { CStr::from_ptr(r.body) }.to_str().unwrap().to_string())
    };

    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();
    let mut response = match (r.method, body) {
        (FfiHttpMethod::Get, _) => agent.get(&path).call(),
        (FfiHttpMethod::Delete, _) => agent.delete(&path).call(),
        (FfiHttpMethod::Post, Some(body)) => {
            agent.post(&path).content_type("application/json").send(body.as_bytes())
        }
        (FfiHttpMethod::Post, None) => agent.post(&path).send_empty(),
    }
    .expect("HTTP transport error");
    todo_free_request(req);

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();
    (status, CString::new(body).unwrap())
}

fn respond(status: u16, body: &CString) -> FfiHttpResponse {
    FfiHttpResponse {
        status,
        body: body.as_ptr(),
    }
}

#[test]
fn host_round_trip() {
    let base_url = CString::new(start_server()).unwrap();
    let sync = todo_sync_new(base_url.as_ptr(), 2171);
    assert!(!sync.is_null());

    let (status, body) = execute(todo_sync_begin_load(sync));
    assert_eq!(todo_sync_finish_load(sync, &respond(status, &body)), FfiErrorCode::Ok);

    let mut ids = Vec::new();
    for title in ["walk dog", "buy milk"] {
        let title = CString::new(title).unwrap();
        let req = todo_sync_begin_create(sync, title.as_ptr(), std::ptr::null_mut());
        let (status, body) = execute(req);
        assert_eq!(status, 201);
        assert_eq!(todo_sync_finish_create(sync, &respond(status, &body)), FfiErrorCode::Ok);
        let created: serde_json::Value = serde_json::from_str(body.to_str().unwrap()).unwrap();
        ids.push(created["id"].as_i64().unwrap());
    }
    assert_eq!(todo_sync_active_count(sync), 2);
    assert_eq!(todo_sync_completed_count(sync), 0);

    // Nothing is completed, so clearing builds no requests.
    let batch = todo_sync_clear_completed(sync);
    assert_eq!(unsafe { &*batch }.len, 0);
    todo_free_batch(batch);

    let (status, body) = execute(todo_sync_begin_remove(sync, ids[0]));
    assert_eq!(todo_sync_finish_remove(sync, ids[0], &respond(status, &body)), FfiErrorCode::Ok);

    let list = todo_sync_visible(sync);
    assert_eq!(unsafe { &*list }.len, 1);
    todo_free_list(list);

    // A second handle deletes the remaining item behind the first one's
    // back, so the first handle's delete comes back 404.
    let other = todo_sync_new(base_url.as_ptr(), 2171);
    let (status, body) = execute(todo_sync_begin_load(other));
    assert_eq!(todo_sync_finish_load(other, &respond(status, &body)), FfiErrorCode::Ok);
    let (status, body) = execute(todo_sync_begin_remove(other, ids[1]));
    assert_eq!(todo_sync_finish_remove(other, ids[1], &respond(status, &body)), FfiErrorCode::Ok);
    assert_eq!(todo_sync_error(other), FfiErrorKind::None);

    let (status, body) = execute(todo_sync_begin_remove(sync, ids[1]));
    assert_eq!(status, 404);
    assert_eq!(
        todo_sync_finish_remove(sync, ids[1], &respond(status, &body)),
        FfiErrorCode::NotFound
    );
    assert_eq!(todo_sync_error(sync), FfiErrorKind::DeleteFailed);

    todo_sync_free(other);
    todo_sync_free(sync);
}
