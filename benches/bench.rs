#![feature(test)]

extern crate radixroute;
extern crate test;

use hyper::Method;
use radixroute::Tree;
use test::Bencher;

// A static API in the shape of a typical REST service.
fn routes() -> Vec<(Method, String)> {
    let mut routes = Vec::new();
    for resource in &["users", "teams", "projects", "issues", "comments", "labels"] {
        for id in 0..50 {
            routes.push((Method::GET, format!("/api/v1/{}/{}", resource, id)));
            routes.push((Method::PUT, format!("/api/v1/{}/{}", resource, id)));
            routes.push((Method::GET, format!("/api/v1/{}/{}/history", resource, id)));
        }
        routes.push((Method::GET, format!("/api/v1/{}", resource)));
        routes.push((Method::POST, format!("/api/v1/{}", resource)));
    }
    routes
}

fn tree(routes: &[(Method, String)]) -> Tree<usize> {
    let mut tree = Tree::default();
    for (idx, (method, path)) in routes.iter().enumerate() {
        tree.insert(method.clone(), path, idx).unwrap();
    }
    tree
}

#[bench]
fn bench_insert(b: &mut Bencher) {
    let routes = routes();

    b.iter(|| test::black_box(tree(&routes)));
}

#[bench]
fn bench_lookup_hit(b: &mut Bencher) {
    let routes = routes();
    let tree = tree(&routes);

    b.iter(|| {
        for (method, path) in &routes {
            test::black_box(tree.at(method, path));
        }
    });
}

#[bench]
fn bench_lookup_miss(b: &mut Bencher) {
    let routes = routes();
    let tree = tree(&routes);
    let misses: Vec<String> = routes.iter().map(|(_, path)| format!("{}/", path)).collect();

    b.iter(|| {
        for path in &misses {
            test::black_box(tree.at(&Method::GET, path));
        }
    });
}

#[bench]
fn bench_enumerate(b: &mut Bencher) {
    let tree = tree(&routes());

    b.iter(|| test::black_box(tree.enumerate()));
}
