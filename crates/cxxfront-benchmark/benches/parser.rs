use std::hint::black_box;

use codspeed_criterion_compat::{
    BenchmarkId, Criterion, Throughput, criterion_group, criterion_main,
};
use cxxfront_errors::Collector;
use cxxfront_parse::RuleSet;

static SIMPLE: &str = r#"
int add(int a, int b)
{
    return a + b;
}
"#;

static MEDIUM: &str = r#"
class Point
{
public:
    Point(int x, int y);
    int x() const;
    int y() const;
private:
    int my_x;
    int my_y;
};

int manhattan(const Point& a, const Point& b)
{
    int dx = a.x() - b.x();
    int dy = a.y() - b.y();
    if (dx < 0) dx = -dx;
    if (dy < 0) dy = -dy;
    return dx + dy;
}

template <class T>
class Stack
{
public:
    void push(const T& value);
    T pop();
private:
    T* my_items;
    unsigned my_size;
};
"#;

fn benchmark_parser(c: &mut Criterion) {
    let cases = [("Simple", SIMPLE), ("Medium", MEDIUM)];

    let mut group = c.benchmark_group("Parser Benchmark");
    for (name, text) in cases {
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse_code", name), &text, |b, &text| {
            b.iter(|| {
                let mut collector = Collector::new();
                let parse = cxxfront_parse::translation_unit(text, RuleSet::strict(), &mut collector);
                black_box(parse);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_parser);
criterion_main!(benches);
