use anyhow::Result;
use bias_agent::{AgentConfig, AgentKind};
use bias_core::BiasError;
use bias_dataset::{
    generate_gridworld_irl, save_dataset, DatasetArray, DatasetConfig, IrlDataset, NUM_ARRAYS,
};
use rand::{rngs::StdRng, SeedableRng};
use tempdir::TempDir;

fn small_config() -> DatasetConfig {
    let agent = AgentConfig::default()
        .kind(AgentKind::Naive)
        .num_iters(15)
        .max_delay(3);
    DatasetConfig::default()
        .imsize(6)
        .reward_prob(0.2)
        .state_batch_size(4)
        .num_train(3)
        .num_test(2)
        .num_mdps(2)
        .agent(agent.clone())
        .other_agent(Some(agent.kind(AgentKind::Myopic).max_delay(1)))
}

#[test]
fn test_irl_dataset_layout() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let rng = &mut StdRng::seed_from_u64(42);
    let dataset = generate_gridworld_irl(&small_config(), rng)?;
    let arrays = dataset.into_arrays();
    assert_eq!(arrays.len(), NUM_ARRAYS);

    for (phase, n) in [3, 2, 2].into_iter().enumerate() {
        let a = &arrays[5 * phase..5 * phase + 5];
        assert_eq!(a[0].shape(), &[n, 6, 6]);
        assert_eq!(a[1].shape(), &[n, 6, 6]);
        assert_eq!(a[2].shape(), &[n, 4]);
        assert_eq!(a[3].shape(), &[n, 4]);
        assert_eq!(a[4].shape(), &[n, 4, 5]);
        assert!(matches!(a[2], DatasetArray::I64(_)));
        assert!(matches!(a[4], DatasetArray::F32(_)));
    }

    if let DatasetArray::F32(labels) = &arrays[4] {
        for row in labels.rows() {
            let sum: f32 = row.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5);
            assert!(row.iter().all(|p| *p >= 0.0));
        }
    }
    Ok(())
}

#[test]
fn test_same_seed_same_dataset() -> Result<()> {
    let config = small_config();
    let d1 = generate_gridworld_irl(&config, &mut StdRng::seed_from_u64(7))?;
    let d2 = generate_gridworld_irl(&config, &mut StdRng::seed_from_u64(7))?;
    assert_eq!(d1, d2);
    Ok(())
}

#[test]
fn test_save_and_load() -> Result<()> {
    let tmp_dir = TempDir::new("irl_dataset")?;
    let path = tmp_dir.path().join("dataset.npz");
    let config = small_config();

    save_dataset(&config, &path, &mut StdRng::seed_from_u64(3))?;
    let loaded = IrlDataset::load(&path)?;
    let expected = generate_gridworld_irl(&config, &mut StdRng::seed_from_u64(3))?;
    assert_eq!(loaded, expected);
    Ok(())
}

#[test]
fn test_empty_partitions_round_trip() -> Result<()> {
    let tmp_dir = TempDir::new("irl_dataset_empty")?;
    let path = tmp_dir.path().join("empty.npz");
    let config = small_config().num_train(0).num_test(0).num_mdps(1);

    let dataset = generate_gridworld_irl(&config, &mut StdRng::seed_from_u64(5))?;
    assert!(dataset.train.is_empty());
    assert_eq!(dataset.unknown_reward.len(), 1);
    dataset.save(&path)?;
    assert_eq!(IrlDataset::load(&path)?, dataset);
    Ok(())
}

#[test]
fn test_invalid_config_fails_fast() {
    let rng = &mut StdRng::seed_from_u64(0);
    let err = generate_gridworld_irl(&small_config().num_actions(4), rng).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<BiasError>(),
        Some(BiasError::InvalidConfig(_))
    ));
}

#[test]
fn test_unknown_agent_in_config_file() -> Result<()> {
    let tmp_dir = TempDir::new("dataset_config")?;
    let path = tmp_dir.path().join("config.yaml");
    small_config().save(&path)?;

    let yaml = std::fs::read_to_string(&path)?.replace("kind: naive", "kind: impatient");
    std::fs::write(&path, yaml)?;
    assert!(DatasetConfig::load(&path).is_err());
    Ok(())
}
