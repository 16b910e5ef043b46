//! graphkit 演示脚本
//!
//! 构建五个顶点的示例图，依次运行各个分析引擎并打印结果。
//! 通过 `RUST_LOG=debug` 查看算法日志。

use graphkit::{
    AnalysisConfig, Centrality, Clustering, Connectivity, EdmondsKarp, Graph, GraphMode,
    Kruskal, PathFinder,
};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("graphkit {} 演示", graphkit::VERSION);
    println!("==================\n");

    // A - B - D - E
    //  \- C -/
    let mut graph = Graph::from_parts(
        GraphMode::Undirected,
        ["A", "B", "C", "D", "E"],
        [
            ("A", "B", 1.0),
            ("A", "C", 1.0),
            ("B", "D", 1.0),
            ("C", "D", 1.0),
            ("D", "E", 1.0),
        ],
    )?;
    if let Some(vertex) = graph.vertex_mut(&"A") {
        vertex.set_property("role", "entry");
    }
    tracing::info!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "示例图已构建"
    );

    println!("1. 遍历与最短路径");
    let finder = PathFinder::new(&graph);
    let path = finder.shortest_path(&"A", &"E")?;
    println!("   A -> E: {:?} ({} 跳)", path.vertices, path.hops);
    println!("   BFS 顺序: {:?}", finder.breadth_first(&"A")?);
    println!("   DFS 顺序: {:?}\n", finder.depth_first(&"A")?);

    println!("2. 连通性");
    let connectivity = Connectivity::new(&graph);
    println!("   连通: {}", connectivity.is_connected()?);
    println!("   连通分量: {:?}", connectivity.connected_components()?);
    println!("   割点: {:?}", connectivity.articulation_points()?);
    println!("   双连通: {}\n", connectivity.is_biconnected()?);

    println!("3. 中心性");
    let centrality = Centrality::new(&graph).with_config(AnalysisConfig::default());
    let report = [
        ("度中心性", centrality.degree_centrality()?),
        ("接近中心性", centrality.closeness_centrality()?),
        ("介数中心性", centrality.betweenness_centrality()?),
        ("特征向量中心性", centrality.eigenvector_centrality()?),
        ("PageRank", centrality.pagerank()?),
    ];
    for (name, scores) in &report {
        let line: Vec<String> = scores
            .iter()
            .map(|(k, v)| format!("{}={:.3}", k, v))
            .collect();
        println!("   {}: {}", name, line.join(", "));
    }
    println!(
        "   平均聚类系数: {:.3}\n",
        Clustering::new(&graph).average_clustering()?
    );

    println!("4. 生成树与最大流");
    let tree = Kruskal::new(&graph).minimum_spanning_tree()?;
    println!("   生成树边数: {}", tree.edge_count());
    let flow = EdmondsKarp::new(&graph).max_flow(&"A", &"E")?;
    let cut = EdmondsKarp::new(&graph).minimum_cut(&"A", &"E")?;
    println!("   A -> E 最大流: {}", flow.value);
    println!("   最小割: {:?} (容量 {})\n", cut.cut_edges, cut.value);

    println!("5. 导出快照");
    println!("{}", graph.snapshot().to_json()?);

    Ok(())
}
