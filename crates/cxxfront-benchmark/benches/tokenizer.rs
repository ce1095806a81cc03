use codspeed_criterion_compat::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use cxxfront_tokenizer::{RuleSet, TokenKind, TokenStream};

static SOURCE: &str = "
void f(int a, const char* b) { while (a-- > 0) *b++; if (a == 0) return; }
void f(int a, const char* b) { while (a-- > 0) *b++; if (a == 0) return; }
void f(int a, const char* b) { while (a-- > 0) *b++; if (a == 0) return; }
void f(int a, const char* b) { while (a-- > 0) *b++; if (a == 0) return; }
void f(int a, const char* b) { while (a-- > 0) *b++; if (a == 0) return; }
void f(int a, const char* b) { while (a-- > 0) *b++; if (a == 0) return; }
void f(int a, const char* b) { while (a-- > 0) *b++; if (a == 0) return; }
void f(int a, const char* b) { while (a-- > 0) *b++; if (a == 0) return; }
";

static IDENTIFIERS: &str =
    "alpha beta gamma delta epsilon zeta eta theta iota kappa lambda mu nu xi omicron pi rho \
     sigma tau upsilon phi chi psi omega alpha beta gamma delta epsilon zeta eta theta iota \
     kappa lambda mu nu xi omicron pi rho sigma tau upsilon phi chi psi omega alpha beta gamma \
     delta epsilon zeta eta theta iota kappa lambda mu nu xi omicron pi rho sigma tau upsilon";

static CANDIDATES: [(&str, &str); 2] =
    [("identifiers", IDENTIFIERS), ("keywords_operators_and_punctators", SOURCE)];

fn iterate(s: &str) {
    let mut stream = TokenStream::new(s, RuleSet::strict());

    loop {
        let token = stream.next();
        if token.kind == TokenKind::EOF {
            break;
        }
        black_box(token);
    }
}

fn bench_iterate(c: &mut Criterion) {
    let mut group = c.benchmark_group("iterate");

    for (name, source) in CANDIDATES {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(name, &source, |b, &s| b.iter(|| iterate(s)));
    }
}

criterion_group!(benches, bench_iterate);
criterion_main!(benches);
